//! egui view over [`DesktopState`].

use crate::state::{DesktopState, PREVIEW_PX};
use crate::SAVE_PATH_LABEL;
use eframe::egui::{self, Align2, ColorImage, RichText, TextEdit, TextureHandle, TextureOptions};

const INPUT_WIDTH: f32 = 300.0;

#[derive(Default)]
pub struct QrDesktopApp {
    state: DesktopState,
    /// Uploaded preview and the generation it was built from.
    texture: Option<(u64, TextureHandle)>,
}

impl QrDesktopApp {
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.state.generation();
        if self
            .texture
            .as_ref()
            .is_some_and(|(shown, _)| *shown == generation)
        {
            return;
        }
        if let Some(preview) = self.state.preview() {
            let size = [preview.width() as usize, preview.height() as usize];
            let image = ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
            let handle = ctx.load_texture("qr-preview", image, TextureOptions::NEAREST);
            self.texture = Some((generation, handle));
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.state.dialog().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(dialog.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(dialog.message());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.state.dismiss_dialog();
        }
    }
}

impl eframe::App for QrDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_texture(ctx);
        let shown_generation = self.state.generation();
        let modal_open = self.state.dialog().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(10.0);
                    ui.label(RichText::new("Enter link for QR Code:").size(16.0));
                    ui.add(TextEdit::singleline(&mut self.state.link_input).desired_width(INPUT_WIDTH));
                    if ui.button("Generate QR Code from Link").clicked() {
                        self.state.generate_from_link();
                    }

                    ui.add_space(10.0);
                    ui.label(RichText::new("Dropbox path (optional):").size(14.0));
                    ui.add(
                        TextEdit::singleline(&mut self.state.dropbox_input)
                            .desired_width(INPUT_WIDTH),
                    );
                    if ui.button("Generate QR Code for Dropbox Path").clicked() {
                        self.state.generate_from_dropbox();
                    }

                    ui.add_space(20.0);
                    ui.label(SAVE_PATH_LABEL);
                    ui.add(TextEdit::singleline(&mut self.state.save_path).desired_width(INPUT_WIDTH));
                    if ui.button("Download QR Code").clicked() {
                        self.state.save();
                    }

                    if let Some((_, texture)) = &self.texture {
                        ui.add_space(10.0);
                        let side = PREVIEW_PX as f32;
                        ui.image((texture.id(), egui::vec2(side, side)));
                        if let Some(payload) = self.state.payload() {
                            ui.label(RichText::new(payload).small().weak());
                        }
                    }
                });
            });
        });

        self.show_dialog(ctx);
        if self.state.generation() != shown_generation {
            ctx.request_repaint();
        }
    }
}
