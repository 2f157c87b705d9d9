//! Fill/background color parsing.

use super::QrError;
use image::Rgba;

/// Parses a color name or hex string into an opaque RGBA pixel.
///
/// Accepts a small set of CSS names and `#rgb` / `#rrggbb` (case-insensitive).
pub fn parse_color(value: &str) -> Result<Rgba<u8>, QrError> {
    let normalized = value.trim().to_ascii_lowercase();
    let rgb = match normalized.as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "yellow" => Some([255, 255, 0]),
        "orange" => Some([255, 165, 0]),
        "purple" => Some([128, 0, 128]),
        "gray" | "grey" => Some([128, 128, 128]),
        "navy" => Some([0, 0, 128]),
        other => other.strip_prefix('#').and_then(parse_hex),
    };

    rgb.map(|[r, g, b]| Rgba([r, g, b, 255]))
        .ok_or_else(|| QrError::InvalidColor(value.to_string()))
}

fn parse_hex(digits: &str) -> Option<[u8; 3]> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(digits.chars()) {
                let nibble = c.to_digit(16)? as u8;
                *slot = nibble * 17;
            }
            Some(rgb)
        }
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}
