//! Desktop QR generator: a link or Dropbox share link in, a PNG file out.

pub mod state;
pub mod ui;

pub use state::{DesktopState, Dialog};
pub use ui::QrDesktopApp;

pub const WINDOW_TITLE: &str = "QR Code Generator";
pub const WINDOW_SIZE: [f32; 2] = [500.0, 600.0];
/// The save target is typed in; there is no native file dialog.
pub const SAVE_PATH_LABEL: &str = "Save as (path):";

#[cfg(test)]
mod tests {
    use super::SAVE_PATH_LABEL;
    use crate::DesktopState;

    #[test]
    fn save_field_reads_as_a_typed_path() {
        assert!(SAVE_PATH_LABEL.contains("path"));
        assert_eq!(DesktopState::default().save_path, "qr_code.png");
    }
}
