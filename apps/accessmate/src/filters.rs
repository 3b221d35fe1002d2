//! Colour-vision filters.
//!
//! Each mode remaps text and background colours that sit near one primary
//! to a replacement the viewer can tell apart, and puts a CSS filter chain
//! on every image. Remapped properties are listed in `data-accessmate-cvd`
//! so a later pass (of any mode) leaves them alone.

use crate::color::{self, ColorTriple, Hue};
use crate::dom::{self, Document};
use crate::error::Error;
use kuchiki::NodeRef;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const GUARD_ATTR: &str = "data-accessmate-cvd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVisionMode {
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl ColorVisionMode {
    pub const ALL: [ColorVisionMode; 3] = [
        ColorVisionMode::Protanopia,
        ColorVisionMode::Deuteranopia,
        ColorVisionMode::Tritanopia,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ColorVisionMode::Protanopia => "protanopia",
            ColorVisionMode::Deuteranopia => "deuteranopia",
            ColorVisionMode::Tritanopia => "tritanopia",
        }
    }

    /// Message action that selects this mode.
    pub const fn action(self) -> &'static str {
        match self {
            ColorVisionMode::Protanopia => "fixProtanopiaColors",
            ColorVisionMode::Deuteranopia => "fixDeuteranopiaColors",
            ColorVisionMode::Tritanopia => "fixTritanopiaColors",
        }
    }

    /// Hue the viewer has trouble with.
    pub const fn source(self) -> Hue {
        match self {
            ColorVisionMode::Protanopia => Hue::Red,
            ColorVisionMode::Deuteranopia => Hue::Green,
            ColorVisionMode::Tritanopia => Hue::Blue,
        }
    }

    pub const fn replacement(self) -> ColorTriple {
        match self {
            ColorVisionMode::Protanopia => ColorTriple::new(0, 0, 255),
            ColorVisionMode::Deuteranopia => ColorTriple::new(255, 0, 255),
            ColorVisionMode::Tritanopia => ColorTriple::new(0, 255, 0),
        }
    }

    pub const fn image_filter(self) -> &'static str {
        match self {
            ColorVisionMode::Protanopia => "hue-rotate(240deg) saturate(1.2)",
            ColorVisionMode::Deuteranopia => "hue-rotate(180deg) saturate(1.2)",
            ColorVisionMode::Tritanopia => "hue-rotate(240deg) contrast(1.1)",
        }
    }
}

impl fmt::Display for ColorVisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorVisionMode {
    type Err = Error;

    /// Accepts the mode name or its message action, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ColorVisionMode::ALL
            .into_iter()
            .find(|m| needle.eq_ignore_ascii_case(m.name()) || needle.eq_ignore_ascii_case(m.action()))
            .ok_or_else(|| Error::UnknownMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    /// Colour properties rewritten.
    pub properties: usize,
    /// Images that received the filter chain.
    pub images: usize,
}

fn guarded(node: &NodeRef) -> Vec<String> {
    dom::attr(node, GUARD_ATTR)
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Whether `property` of `node` comes from a remapped declaration. `color`
/// inherits, so the nearest ancestor-or-self declaring it decides;
/// `background-color` only looks at the element itself.
fn is_guarded(node: &NodeRef, property: &str) -> bool {
    let source = if property == "color" {
        node.inclusive_ancestors()
            .filter(|n| n.as_element().is_some())
            .find(|n| dom::style_property(n, property).is_some())
    } else {
        Some(node.clone())
    };
    source.is_some_and(|n| guarded(&n).iter().any(|g| g == property))
}

fn remap(node: &NodeRef, property: &str, value: &str, mode: ColorVisionMode, threshold: f64) -> bool {
    let Some(parsed) = color::parse_color(value) else {
        return false;
    };
    if !color::is_near(parsed, mode.source(), threshold) {
        return false;
    }
    dom::set_style_property(node, property, &mode.replacement().to_string(), true);
    tracing::debug!(property, from = value, to = %mode.replacement(), "remapped colour");
    true
}

/// Apply `mode` to every element of `doc`.
pub fn apply(doc: &mut Document, mode: ColorVisionMode, threshold: f64) -> FilterOutcome {
    tracing::info!(%mode, threshold, "applying colour-vision filter");
    let mut outcome = FilterOutcome::default();

    for node in doc.elements() {
        let mut guard = guarded(&node);
        let style = doc.computed_style(&node);
        let candidates = [
            ("color", style.color.as_str()),
            ("background-color", style.background_color.as_str()),
        ];
        let mut touched = false;
        for (property, value) in candidates {
            if is_guarded(&node, property) {
                continue;
            }
            if remap(&node, property, value, mode, threshold) {
                guard.push(property.to_string());
                outcome.properties += 1;
                touched = true;
            }
        }
        if touched {
            dom::set_attr(&node, GUARD_ATTR, &guard.join(" "));
        }
    }

    for img in doc.select("img") {
        dom::set_style_property(&img, "filter", mode.image_filter(), false);
        outcome.images += 1;
    }
    outcome
}
