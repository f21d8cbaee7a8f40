//! Normalized RGBA colors and color-spec parsing.

use crate::error::{GrainError, Result};
use std::fmt;
use std::str::FromStr;

/// A color with red, green, blue and alpha channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

fn unit(v: f64) -> f64 {
    // adding +0.0 turns -0.0 into 0.0
    v.clamp(0.0, 1.0) + 0.0
}

impl Rgba {
    /// Creates a color with every channel clamped to 0.0-1.0. Negative zero
    /// becomes positive zero.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    /// Creates an opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates an opaque gray with all three channels set to `value`.
    pub fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    /// Creates a color from 8-bit channels, dividing each by 255.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: f64::from(a) / 255.0,
        }
    }

    /// Opaque black.
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Opaque white.
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Converts to 8-bit channels, rounding to nearest.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let channel = |v: f64| (v * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// Parses a color spec.
    ///
    /// Accepted forms:
    /// - `#rgb` and `#rgba`, each digit doubled (`#f80` is `#ff8800`)
    /// - `#rrggbb` and `#rrggbbaa`
    /// - comma-separated channels `r,g,b` or `r,g,b,a`, each between `0` and `1`
    /// - a decimal gray level between `0` and `1` such as `0.75`
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let invalid = || GrainError::InvalidColor(spec.to_string());

        if let Some(hex) = spec.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }

            let digits: Vec<u8> = match hex.len() {
                3 | 4 => hex
                    .chars()
                    .map(|c| {
                        let d = c.to_digit(16).unwrap_or(0) as u8;
                        d * 16 + d
                    })
                    .collect(),
                6 | 8 => (0..hex.len())
                    .step_by(2)
                    .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| invalid())?,
                _ => return Err(invalid()),
            };

            let alpha = digits.get(3).copied().unwrap_or(255);
            return Ok(Self::from_rgba8(digits[0], digits[1], digits[2], alpha));
        }

        let channels = spec
            .split(',')
            .map(|part| match part.trim().parse::<f64>() {
                Ok(v) if (0.0..=1.0).contains(&v) => Ok(v),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<f64>>>()?;

        match channels[..] {
            [level] => Ok(Self::gray(level)),
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Rgba {
    type Err = GrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_new_clamps_channels() {
        let color = Rgba::new(1.5, -0.2, 0.5, 2.0);
        assert_eq!(color, Rgba::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_negative_zero_normalized() {
        let color = Rgba::new(-0.0, 0.0, -0.0, -0.0);
        assert!(color.r.is_sign_positive());
        assert!(color.b.is_sign_positive());
        assert!(color.a.is_sign_positive());

        let parsed = Rgba::parse("-0,0,-0").unwrap();
        assert!(parsed.r.is_sign_positive());
        assert!(parsed.b.is_sign_positive());
        assert!(Rgba::parse("-0").unwrap().g.is_sign_positive());
    }

    #[test]
    fn test_parse_long_hex() {
        let color = Rgba::parse("#1f77b4").unwrap();
        assert_close(color.r, 31.0 / 255.0);
        assert_close(color.g, 119.0 / 255.0);
        assert_close(color.b, 180.0 / 255.0);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let color = Rgba::parse("#ff000080").unwrap();
        assert_eq!(color.r, 1.0);
        assert_close(color.a, 128.0 / 255.0);
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgba::parse("#f80").unwrap(), Rgba::parse("#ff8800").unwrap());
        assert_eq!(
            Rgba::parse("#f808").unwrap(),
            Rgba::parse("#ff880088").unwrap()
        );
    }

    #[test]
    fn test_parse_gray_level() {
        assert_eq!(Rgba::parse("0.75").unwrap(), Rgba::gray(0.75));
        assert_eq!(Rgba::parse("1").unwrap(), Rgba::white());
    }

    #[test]
    fn test_parse_channel_list() {
        assert_eq!(Rgba::parse("0,0.5,0").unwrap(), Rgba::rgb(0.0, 0.5, 0.0));
        assert_eq!(
            Rgba::parse("0.2, 0.4, 0.6, 0.8").unwrap(),
            Rgba::new(0.2, 0.4, 0.6, 0.8)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for spec in [
            "", "#", "#12", "#12345", "#gggggg", "1.5", "-0.1", "red", "0,1", "0,0,2", "0,,1",
        ] {
            assert!(
                matches!(Rgba::parse(spec), Err(GrainError::InvalidColor(_))),
                "spec {spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_to_rgba8_roundtrips_hex() {
        let color: Rgba = "#d62728".parse().unwrap();
        assert_eq!(color.to_rgba8(), [0xd6, 0x27, 0x28, 0xff]);
        assert_eq!(color.to_string(), "#d62728");
    }

    #[test]
    fn test_display_includes_alpha_when_translucent() {
        let color = Rgba::from_rgba8(0, 0, 0, 0x40);
        assert_eq!(color.to_string(), "#00000040");
    }
}
