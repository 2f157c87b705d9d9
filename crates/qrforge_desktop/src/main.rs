//! `qrforge-desktop` entry point.

use eframe::egui;
use qrforge_core::{default_log_level, init_logging};
use qrforge_desktop::{QrDesktopApp, WINDOW_SIZE, WINDOW_TITLE};
use std::env;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    dotenvy::dotenv().ok();
    init_desktop_logging();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(QrDesktopApp::default()))),
    )
}

/// Logging is best-effort here; the window opens even when it fails.
fn init_desktop_logging() {
    let level = env::var("QRFORGE_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
    let raw_dir = env::var_os("QRFORGE_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(err) = init_logging(&level, &raw_dir) {
        eprintln!("qrforge-desktop: logging disabled: {err}");
    }
}
