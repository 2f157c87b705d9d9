//! QR rasterization and PNG helpers.

use super::color::parse_color;
use super::QrError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Pixels per QR module.
pub const MODULE_PX: u32 = 10;
/// Upper bound for either image side after compression.
pub const MAX_IMAGE_PX: u32 = 800;

/// Colors used when rasterizing a QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub fill: Rgba<u8>,
    pub back: Rgba<u8>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            fill: Rgba([0, 0, 0, 255]),
            back: Rgba([255, 255, 255, 255]),
        }
    }
}

impl QrStyle {
    /// Builds a style from client-provided color strings.
    pub fn from_colors(fill: &str, back: &str) -> Result<Self, QrError> {
        Ok(Self {
            fill: parse_color(fill)?,
            back: parse_color(back)?,
        })
    }
}

/// Encodes `data` and renders it with a 4-module quiet zone.
pub fn render_qr(data: &str, style: &QrStyle) -> Result<RgbaImage, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)?;
    let image = code
        .render::<Rgba<u8>>()
        .dark_color(style.fill)
        .light_color(style.back)
        .quiet_zone(true)
        .module_dimensions(MODULE_PX, MODULE_PX)
        .build();
    Ok(image)
}

/// Shrinks `image` to fit within `max_px`×`max_px`, keeping aspect ratio.
///
/// Images already within bounds are returned unchanged.
pub fn compress_image(image: RgbaImage, max_px: u32) -> RgbaImage {
    if image.width() <= max_px && image.height() <= max_px {
        return image;
    }
    DynamicImage::ImageRgba8(image)
        .resize(max_px, max_px, FilterType::Lanczos3)
        .to_rgba8()
}

/// Encodes `image` as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QrError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// `data:image/png;base64,...` URL for embedding in JSON responses.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
