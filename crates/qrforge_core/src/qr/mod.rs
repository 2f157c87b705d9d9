//! QR payload building and image rendering.
//!
//! # Responsibility
//! - Turn typed generation requests into the text a QR code encodes.
//! - Render that text through the `qrcode` crate and post-process the
//!   raster with `image` (colors, size cap, PNG, data URL).
//!
//! # Invariants
//! - Encoding uses error-correction level L, 10 px modules and a 4-module
//!   quiet zone.
//! - Rendered images never exceed 800×800 after `compress_image`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod color;
pub mod dropbox;
pub mod payload;
pub mod render;

pub use color::parse_color;
pub use dropbox::modify_dropbox_link;
pub use payload::{build_payload, GenerateRequest};
pub use render::{compress_image, encode_png, png_data_url, render_qr, QrStyle};

/// Error raised while building or rendering a QR code.
#[derive(Debug)]
pub enum QrError {
    /// A field required by the payload type is absent or blank.
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    /// Color string is neither a known name nor `#rgb`/`#rrggbb`.
    InvalidColor(String),
    /// Payload does not fit in any QR version.
    Encode(qrcode::types::QrError),
    Image(image::ImageError),
}

impl Display for QrError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { kind, field } => {
                write!(f, "`{field}` is required for {kind} QR codes")
            }
            Self::InvalidColor(value) => write!(f, "unsupported color `{value}`"),
            Self::Encode(err) => write!(f, "qr encoding failed: {err}"),
            Self::Image(err) => write!(f, "image processing failed: {err}"),
        }
    }
}

impl Error for QrError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(value: qrcode::types::QrError) -> Self {
        Self::Encode(value)
    }
}

impl From<image::ImageError> for QrError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

impl QrError {
    /// Whether the error stems from client input rather than a library failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidColor(_) | Self::Encode(_)
        )
    }
}
