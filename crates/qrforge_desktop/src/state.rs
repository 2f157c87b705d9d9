//! GUI-free state of the desktop generator.
//!
//! # Invariants
//! - At most one dialog is pending; a new one replaces the old.
//! - `generation` increases on every successful render so the view knows
//!   when to re-upload its texture.
//! - Saved files always carry a `.png` extension and hold the full-size
//!   render, not the preview.

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use log::{error, info};
use qrforge_core::qr::{modify_dropbox_link, render_qr, QrStyle};
use std::path::PathBuf;

pub const PREVIEW_PX: u32 = 250;
pub const DEFAULT_SAVE_PATH: &str = "qr_code.png";

/// Modal message shown over the main window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Error(String),
    Info(String),
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Error(_) => "Error",
            Self::Info(_) => "Success",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Error(message) | Self::Info(message) => message,
        }
    }
}

#[derive(Debug)]
pub struct DesktopState {
    pub link_input: String,
    pub dropbox_input: String,
    pub save_path: String,
    qr: Option<RgbaImage>,
    payload: Option<String>,
    generation: u64,
    dialog: Option<Dialog>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            link_input: String::new(),
            dropbox_input: String::new(),
            save_path: DEFAULT_SAVE_PATH.to_string(),
            qr: None,
            payload: None,
            generation: 0,
            dialog: None,
        }
    }
}

impl DesktopState {
    pub fn generate_from_link(&mut self) {
        let link = self.link_input.trim().to_string();
        if link.is_empty() {
            self.dialog = Some(Dialog::Error(
                "Please enter a link to generate QR code".to_string(),
            ));
            return;
        }
        self.generate(link);
    }

    /// Encodes a Dropbox share link, switched to direct download.
    pub fn generate_from_dropbox(&mut self) {
        let path = self.dropbox_input.trim();
        if path.is_empty() {
            self.dialog = Some(Dialog::Error(
                "Please enter a Dropbox path to generate QR code".to_string(),
            ));
            return;
        }
        let link = modify_dropbox_link(path);
        self.generate(link);
    }

    fn generate(&mut self, payload: String) {
        match render_qr(&payload, &QrStyle::default()) {
            Ok(image) => {
                self.generation += 1;
                info!(
                    "event=desktop_generate module=desktop status=ok generation={} width={}",
                    self.generation,
                    image.width()
                );
                self.qr = Some(image);
                self.payload = Some(payload);
            }
            Err(err) => {
                error!("event=desktop_generate module=desktop status=error error=\"{err}\"");
                self.dialog = Some(Dialog::Error(format!("Could not generate QR code: {err}")));
            }
        }
    }

    /// Writes the current code as PNG to `save_path`.
    pub fn save(&mut self) {
        let outcome = match (&self.qr, png_save_path(&self.save_path)) {
            (None, _) => Err("No QR code generated yet".to_string()),
            (Some(_), None) => Err("Please enter a file name for the QR code".to_string()),
            (Some(image), Some(path)) => image
                .save_with_format(&path, ImageFormat::Png)
                .map(|()| path)
                .map_err(|err| format!("Could not save QR code: {err}")),
        };

        self.dialog = Some(match outcome {
            Ok(path) => {
                info!("event=desktop_save module=desktop status=ok");
                Dialog::Info(format!("QR code saved at {}", path.display()))
            }
            Err(message) => {
                error!("event=desktop_save module=desktop status=error");
                Dialog::Error(message)
            }
        });
    }

    /// Current code scaled to the on-screen preview size.
    pub fn preview(&self) -> Option<RgbaImage> {
        self.qr
            .as_ref()
            .map(|image| imageops::resize(image, PREVIEW_PX, PREVIEW_PX, FilterType::Nearest))
    }

    /// Text encoded in the current code.
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }
}

/// Normalizes a user-typed path, appending `.png` unless already present.
fn png_save_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut path = PathBuf::from(trimmed);
    let has_png_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !has_png_extension {
        let mut file_name = path.file_name()?.to_os_string();
        file_name.push(".png");
        path.set_file_name(file_name);
    }
    Some(path)
}
