//! Chart colors.
//!
//! Colors are written the way the chart config has always written them:
//! `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` or `transparent`.

use plotters::style::RGBAColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorParseError {
    #[error("Unrecognized color: {0}")]
    Unrecognized(String),
    #[error("Color component out of range in {0}")]
    OutOfRange(String),
}

/// 8-bit RGB with a 0..=1 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Linear interpolation, `t` clamped to 0..=1.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_plotters(self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.a as f64)
    }

    pub fn to_egui(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(
            self.r,
            self.g,
            self.b,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        if text == "transparent" {
            return Ok(Rgba::TRANSPARENT);
        }
        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::Unrecognized(s.to_string()));
        }

        let (args, has_alpha) = if let Some(rest) = text.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = text.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(ColorParseError::Unrecognized(s.to_string()));
        };
        let args = args
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::Unrecognized(s.to_string()))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ColorParseError::Unrecognized(s.to_string()));
        }

        let channel = |p: &str| -> Result<u8, ColorParseError> {
            p.parse::<u8>()
                .map_err(|_| ColorParseError::OutOfRange(s.to_string()))
        };
        let a = if has_alpha {
            let a: f32 = parts[3]
                .parse()
                .map_err(|_| ColorParseError::Unrecognized(s.to_string()))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(ColorParseError::OutOfRange(s.to_string()));
            }
            a
        } else {
            1.0
        };

        Ok(Rgba::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Some(Rgba::rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_forms() {
        assert_eq!("#ec250d".parse::<Rgba>().unwrap(), Rgba::rgb(236, 37, 13));
        assert_eq!("#333".parse::<Rgba>().unwrap(), Rgba::rgb(51, 51, 51));
        assert_eq!(
            "rgba(233,32,16,0.2)".parse::<Rgba>().unwrap(),
            Rgba::new(233, 32, 16, 0.2)
        );
        assert_eq!(
            "rgb( 29, 140, 248 )".parse::<Rgba>().unwrap(),
            Rgba::rgb(29, 140, 248)
        );
        assert!("transparent".parse::<Rgba>().unwrap().is_transparent());
    }

    #[test]
    fn rejects_garbage() {
        assert!("red".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
        assert!(matches!(
            "rgb(300,0,0)".parse::<Rgba>(),
            Err(ColorParseError::OutOfRange(_))
        ));
        assert!("rgba(1,2,3)".parse::<Rgba>().is_err());
    }

    #[test]
    fn display_round_trips_through_config() {
        let json = serde_json::to_string(&Rgba::new(233, 32, 16, 0.5)).unwrap();
        assert_eq!(json, "\"rgba(233,32,16,0.5)\"");
        let back: Rgba = serde_json::from_str("\"#9a9a9a\"").unwrap();
        assert_eq!(back, Rgba::rgb(154, 154, 154));
    }

    #[test]
    fn lerp_blends_channels_and_alpha() {
        let from = Rgba::new(0, 0, 0, 0.0);
        let to = Rgba::new(200, 100, 50, 1.0);
        assert_eq!(from.lerp(to, 0.5), Rgba::new(100, 50, 25, 0.5));
        assert_eq!(from.lerp(to, 2.0), to);
    }
}
