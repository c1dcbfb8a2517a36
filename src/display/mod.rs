mod app;
mod input;
mod texture;

pub use app::CutoutApp;

use crate::controller::SessionController;
use anyhow::Result;
use eframe::egui;
use std::time::Duration;

pub const MAIN_TITLE: &str = "Cutout tool";
pub const MASK_TITLE: &str = "Cutout Mask";
pub const RESULT_TITLE: &str = "Cutout Result";

/// Input polling interval
pub const TICK: Duration = Duration::from_millis(20);

/// Open the main window and run the event loop until quit
pub fn run(controller: SessionController) -> Result<()> {
    let (width, height) = controller.session().original().dimensions();
    tracing::info!("Opening display for {}x{} image", width, height);
    tracing::info!("Keys: 'r' select rectangle, 'g' run cutout, 'q' quit");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(MAIN_TITLE)
            .with_inner_size([width as f32 + 24.0, height as f32 + 56.0]),
        ..Default::default()
    };

    eframe::run_native(
        MAIN_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(CutoutApp::new(controller)))),
    )
    .map_err(|e| anyhow::anyhow!("Display backend failed: {e}"))
}
