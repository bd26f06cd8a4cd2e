//! Color parsing and encoding.
//!
//! One canonical codec for the string color encodings that appear in shape
//! records: `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`. The same codec
//! is used when reading a stroke into the attribute panel and when writing
//! an opacity back into the stroke, so the two paths can never disagree.
//! Unsupported encodings log a warning and fall back to opaque black.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default fill applied to newly created and pasted shapes.
pub const DEFAULT_FILL: &str = "#aabbcc";

#[derive(Debug, Error)]
pub enum ColorParseError {
    #[error("unsupported color encoding: {0:?}")]
    Unsupported(String),
}

/// A parsed color with a 0.0-1.0 alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 1.0)
    }

    /// Parse any supported encoding.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex)
                .ok_or_else(|| ColorParseError::Unsupported(input.to_string()));
        }
        if let Some(body) = strip_call(s, "rgba") {
            return Self::parse_components(body, true)
                .ok_or_else(|| ColorParseError::Unsupported(input.to_string()));
        }
        if let Some(body) = strip_call(s, "rgb") {
            return Self::parse_components(body, false)
                .ok_or_else(|| ColorParseError::Unsupported(input.to_string()));
        }
        Err(ColorParseError::Unsupported(input.to_string()))
    }

    /// Parse, falling back to opaque black on anything unsupported.
    pub fn parse_or_black(input: &str) -> Self {
        match Self::parse(input) {
            Ok(color) => color,
            Err(err) => {
                log::warn!("{err}, using black");
                Self::black()
            }
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b, 1.0))
    }

    fn parse_components(body: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let r: u8 = parts[0].parse().ok()?;
        let g: u8 = parts[1].parse().ok()?;
        let b: u8 = parts[2].parse().ok()?;
        let alpha = if with_alpha {
            let a: f64 = parts[3].parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            a
        } else {
            1.0
        };
        Some(Self::new(r, g, b, alpha))
    }

    /// Emit as `#rrggbb`. Alpha is dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Emit as `rgba(r,g,b,a)`.
    pub fn to_rgba_string(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.alpha)
    }

    /// Same color at a different alpha.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

fn strip_call<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = Rgba::parse("#aabbcc").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xaa, 0xbb, 0xcc));
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn test_parse_rgb_and_rgba() {
        let c = Rgba::parse("rgb(1, 2, 3)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.alpha), (1, 2, 3, 1.0));

        let c = Rgba::parse("rgba(10, 20, 30, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(c.alpha, 0.5);
    }

    #[test]
    fn test_unsupported_falls_back_to_black() {
        assert_eq!(Rgba::parse_or_black("hsl(10, 50%, 50%)"), Rgba::black());
        assert_eq!(Rgba::parse_or_black("#abc"), Rgba::black());
        assert_eq!(Rgba::parse_or_black(""), Rgba::black());
    }

    #[test]
    fn test_round_trip_is_stable() {
        // read(write(x)): re-encoding at an alpha then parsing reads the
        // same alpha back.
        let written = Rgba::parse_or_black("#000000").with_alpha(0.5);
        assert_eq!(written.to_rgba_string(), "rgba(0,0,0,0.5)");
        let read = Rgba::parse(&written.to_rgba_string()).unwrap();
        assert_eq!(read.alpha, 0.5);
        assert_eq!(read.to_hex(), "#000000");
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        assert!(Rgba::parse("rgba(0,0,0,1.5)").is_err());
    }
}
