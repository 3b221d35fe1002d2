//! Colour helpers used by the contrast rule and the colour-vision filters.
//!
//! Values come from computed styles, which are always serialized as
//! `rgb(r, g, b)` or `rgba(r, g, b, a)` when the colour is understood. Any
//! other string (unsupported formats, `var(...)`) parses to `None` and the
//! caller skips the element.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Default Euclidean distance under which a colour counts as "near" a hue.
pub const DEFAULT_NEAR_THRESHOLD: f64 = 80.0;

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").expect("static rgb pattern")
});

/// An sRGB channel triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTriple {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorTriple {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for ColorTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Reference primaries for near-hue classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    Red,
    Green,
    Blue,
}

impl Hue {
    pub const fn reference(self) -> ColorTriple {
        match self {
            Hue::Red => ColorTriple::new(255, 0, 0),
            Hue::Green => ColorTriple::new(0, 255, 0),
            Hue::Blue => ColorTriple::new(0, 0, 255),
        }
    }
}

/// Extract the first three channels of an `rgb()`/`rgba()` string.
///
/// Channels above 255 are clamped; anything that does not match the
/// pattern returns `None`.
pub fn parse_color(css: &str) -> Option<ColorTriple> {
    let caps = RGB_RE.captures(css)?;
    let channel = |i: usize| -> Option<u8> {
        let v: u32 = caps.get(i)?.as_str().parse().ok()?;
        Some(v.min(255) as u8)
    };
    Some(ColorTriple::new(channel(1)?, channel(2)?, channel(3)?))
}

/// Euclidean distance between `color` and the reference primary of `hue`.
pub fn distance(color: ColorTriple, hue: Hue) -> f64 {
    let reference = hue.reference();
    let d = |a: u8, b: u8| {
        let x = a as f64 - b as f64;
        x * x
    };
    (d(color.r, reference.r) + d(color.g, reference.g) + d(color.b, reference.b)).sqrt()
}

pub fn is_near(color: ColorTriple, hue: Hue, threshold: f64) -> bool {
    distance(color, hue) < threshold
}

/// BT.601 perceptual luminance in the 0..=255 range.
pub fn luminance(color: ColorTriple) -> f64 {
    0.299 * color.r as f64 + 0.587 * color.g as f64 + 0.114 * color.b as f64
}

/// Black text on bright backgrounds, white text otherwise.
pub fn readable_foreground(background: ColorTriple) -> &'static str {
    if luminance(background) > 128.0 {
        "#000000"
    } else {
        "#ffffff"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(ColorTriple::new(10, 20, 30)));
        assert_eq!(
            parse_color("rgba(1,2,3, 0.5)"),
            Some(ColorTriple::new(1, 2, 3))
        );
    }

    #[test]
    fn rejects_unsupported_formats() {
        assert_eq!(parse_color("transparent"), None);
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("var(--brand)"), None);
        assert_eq!(parse_color(""), None);
        assert_eq!(parse_color("rgb(99999999999, 0, 0)"), None);
    }

    #[test]
    fn clamps_out_of_range_channels() {
        assert_eq!(parse_color("rgb(300, 0, 0)"), Some(ColorTriple::new(255, 0, 0)));
    }

    #[test]
    fn near_red_uses_euclidean_distance() {
        let reddish = ColorTriple::new(250, 5, 5);
        assert!((distance(reddish, Hue::Red) - 75f64.sqrt()).abs() < 1e-9);
        assert!(is_near(reddish, Hue::Red, DEFAULT_NEAR_THRESHOLD));
        let grey = ColorTriple::new(120, 120, 120);
        assert!(distance(grey, Hue::Red) > 180.0);
        assert!(!is_near(grey, Hue::Red, DEFAULT_NEAR_THRESHOLD));
    }

    #[test]
    fn luminance_picks_readable_text() {
        let dark = ColorTriple::new(10, 10, 10);
        assert!((luminance(dark) - 10.0).abs() < 1e-9);
        assert_eq!(readable_foreground(dark), "#ffffff");
        assert_eq!(readable_foreground(ColorTriple::new(250, 250, 250)), "#000000");
    }
}
