mod composite;
mod controller;
mod display;
mod error;
mod geometry;
mod refine;
mod segmentation;
mod session;
mod source;

use clap::Parser;
use controller::SessionController;
use source::{FileSource, ImageSource};
use std::process::ExitCode;

/// Exit status when the source image cannot be loaded
const EXIT_LOAD_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to cut objects out of
    #[arg(short, long, default_value = "images/objects.png")]
    image: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Cutout starting");

    let image = match FileSource::new(&args.image).load() {
        Ok(image) => image,
        Err(err) => {
            tracing::error!("{:#}", anyhow::Error::new(err));
            return ExitCode::from(EXIT_LOAD_FAILURE);
        }
    };

    let segmenter = segmentation::create_default_segmenter();
    tracing::info!("Using {} segmenter", segmenter.name());
    let controller = SessionController::new(image, segmenter);

    match display::run(controller) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
