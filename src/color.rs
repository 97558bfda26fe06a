//! Color parsing for palette entries
//!
//! Supports the following string formats:
//! - Hex: `#RGB`, `#RRGGBB` (and `#RGBA`, `#RRGGBBAA` when alpha is 0 or full)
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.
//!
//! Sheets have no partial transparency, so any color whose alpha is neither
//! 0 nor 255 is rejected.

use crate::models::PaletteColor;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// Packed integer outside 0x000000..=0xFFFFFF (and not -1)
    #[error("color value {0} is outside 0x000000..=0xFFFFFF")]
    OutOfRange(i64),
    /// Alpha other than fully opaque or fully transparent
    #[error("partial alpha {0} is not supported, use an opaque color or null")]
    PartialAlpha(u8),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into a palette entry.
///
/// # Examples
///
/// ```
/// use pxsheet::color::parse_color;
/// use pxsheet::models::PaletteColor;
///
/// assert_eq!(parse_color("#F00").unwrap(), PaletteColor::Rgb([255, 0, 0]));
/// assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), PaletteColor::Rgb([0, 255, 0]));
/// assert_eq!(parse_color("transparent").unwrap(), PaletteColor::Transparent);
/// assert!(parse_color("rgba(0, 0, 0, 0.5)").is_err());
/// ```
pub fn parse_color(s: &str) -> Result<PaletteColor, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    let [r, g, b, a] = if let Some(hex) = s.strip_prefix('#') {
        parse_hex_color(hex)?
    } else {
        parse_css_color(s)?
    };

    match a {
        0 => Ok(PaletteColor::Transparent),
        255 => Ok(PaletteColor::Rgb([r, g, b])),
        partial => Err(ColorError::PartialAlpha(partial)),
    }
}

/// Parse the digits of a hex color (without the leading '#')
fn parse_hex_color(hex: &str) -> Result<[u8; 4], ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    // All characters are ASCII hex digits past this point
    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();

    match digits.as_slice() {
        [r, g, b] => Ok([r * 17, g * 17, b * 17, 255]),
        [r, g, b, a] => Ok([r * 17, g * 17, b * 17, a * 17]),
        [r1, r2, g1, g2, b1, b2] => Ok([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255]),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            Ok([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2])
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<[u8; 4], ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<[u8; 4], ColorError> {
    use lightningcss::values::color::FloatColor;

    // Convert to sRGB color space first, then extract RGBA
    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok([rgba.red, rgba.green, rgba.blue, rgba.alpha]),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
                (rgb.alpha * 255.0).round() as u8,
            ]),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
