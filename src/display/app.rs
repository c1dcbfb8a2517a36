use super::input::{poll_events, ImageArea};
use super::texture::{mask_to_color_image, rgb_to_color_image};
use super::{MASK_TITLE, RESULT_TITLE, TICK};
use crate::controller::{Cutout, Event, SessionController, Status};
use eframe::egui::{self, Color32, RichText, TextureHandle, TextureOptions};

/// Primary window showing the working image plus the two cutout windows
pub struct CutoutApp {
    controller: SessionController,
    working: Option<TextureHandle>,
    working_stale: bool,
    mask: Option<TextureHandle>,
    result: Option<TextureHandle>,
    show_mask: bool,
    show_result: bool,
    status: Option<Status>,
}

impl CutoutApp {
    pub fn new(controller: SessionController) -> Self {
        Self {
            controller,
            working: None,
            working_stale: true,
            mask: None,
            result: None,
            show_mask: false,
            show_result: false,
            status: None,
        }
    }

    fn refresh_working(&mut self, ctx: &egui::Context) {
        if !self.working_stale {
            return;
        }
        let image = rgb_to_color_image(self.controller.session().working());
        match &mut self.working {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.working = Some(ctx.load_texture("working", image, TextureOptions::NEAREST))
            }
        }
        self.working_stale = false;
    }

    fn show_cutout(&mut self, ctx: &egui::Context, cutout: &Cutout) {
        self.mask = Some(ctx.load_texture(
            "mask",
            mask_to_color_image(&cutout.mask),
            TextureOptions::NEAREST,
        ));
        self.result = Some(ctx.load_texture(
            "result",
            rgb_to_color_image(&cutout.result),
            TextureOptions::NEAREST,
        ));
        self.show_mask = true;
        self.show_result = true;
    }

    fn handle(&mut self, ctx: &egui::Context, events: Vec<Event>) {
        for event in events {
            let outcome = self.controller.dispatch(event);
            self.working_stale = true;

            if outcome.is_quit() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            if let Some(cutout) = &outcome.cutout {
                self.show_cutout(ctx, cutout);
            }
            self.status = Some(outcome.status);
        }
    }

    fn status_line(&self, ui: &mut egui::Ui) {
        let text = match &self.status {
            None => RichText::new("Press 'r' to select a rectangle, 'g' to cut out, 'q' to quit"),
            Some(status @ Status::Error(_)) => {
                RichText::new(status.message()).color(Color32::LIGHT_RED)
            }
            Some(status) => RichText::new(status.message()),
        };
        ui.horizontal(|ui| {
            if self.controller.is_selecting() {
                ui.label(RichText::new("[selecting]").color(Color32::LIGHT_GREEN));
            }
            ui.label(text);
        });
    }
}

impl eframe::App for CutoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_working(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_line(ui));

        // Image area, only while the pointer is over it and not behind a window
        let mut area = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(texture) = &self.working else {
                return;
            };
            let size = texture.size();
            egui::ScrollArea::both().show(ui, |ui| {
                let response = ui.add(
                    egui::Image::new(texture)
                        .fit_to_original_size(1.0)
                        .sense(egui::Sense::click()),
                );
                if response.contains_pointer() {
                    area = Some(ImageArea {
                        shown: response.rect,
                        size,
                    });
                }
            });
        });

        if let Some(mask) = &self.mask {
            egui::Window::new(MASK_TITLE)
                .open(&mut self.show_mask)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.image(mask);
                });
        }
        if let Some(result) = &self.result {
            egui::Window::new(RESULT_TITLE)
                .open(&mut self.show_result)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.image(result);
                });
        }

        let events = ctx.input(|input| poll_events(input, area));
        self.handle(ctx, events);
        ctx.request_repaint_after(TICK);
    }
}
