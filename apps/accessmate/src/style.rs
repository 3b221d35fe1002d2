//! Inline style declarations and the computed values derived from them.
//!
//! There is no rendering engine behind a headless document, so computed
//! style is rebuilt from `style` attributes along the ancestor chain:
//! - `color` and `font-size` inherit, `background-color` does not.
//! - Values are parsed by `lightningcss`; colours resolve to sRGB and
//!   serialize the way browsers report them (`rgb(r, g, b)` or
//!   `rgba(r, g, b, a)`). Colours that cannot be resolved (`var()`,
//!   unknown words) keep their CSS text in lower case so downstream colour
//!   parsing fails softly.
//! - No user-agent stylesheet and no `<style>` blocks are applied.
//!
//! The declaration list below edits attribute text and keeps author values
//! as written; it never interprets them.

use lightningcss::properties::font::{AbsoluteFontSize, FontSize, RelativeFontSize};
use lightningcss::properties::{Property, PropertyId};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleAttribute};
use lightningcss::traits::ToCss;
use lightningcss::values::color::{CssColor, SRGB};
use lightningcss::values::length::{LengthPercentage, LengthValue};

pub const INITIAL_COLOR: &str = "rgb(0, 0, 0)";
pub const INITIAL_BACKGROUND: &str = "rgba(0, 0, 0, 0)";
pub const INITIAL_FONT_SIZE_PX: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
/// One `property: value [!important]` entry of an inline style.
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Parse an inline `style` attribute into ordered declarations.
///
/// Property names are lower-cased; empty or malformed entries are dropped.
pub fn parse_declarations(style: &str) -> Vec<Declaration> {
    split_declarations(style)
        .into_iter()
        .filter_map(|chunk| {
            let (prop, value) = chunk.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let mut value = value.trim().to_string();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            let mut important = false;
            let lower = value.to_ascii_lowercase();
            if let Some(pos) = lower.rfind("!important") {
                if lower[pos + "!important".len()..].trim().is_empty() {
                    important = true;
                    value = value[..pos].trim().to_string();
                }
            }
            if value.is_empty() {
                return None;
            }
            Some(Declaration {
                property: prop,
                value,
                important,
            })
        })
        .collect()
}

/// Split on `;` outside parentheses and quotes, so `url(data:...;base64,...)`
/// stays in one piece.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (i, ch) in style.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&style[start..]);
    out
}

pub fn serialize_declarations(decls: &[Declaration]) -> String {
    decls
        .iter()
        .map(|d| {
            if d.important {
                format!("{}: {} !important;", d.property, d.value)
            } else {
                format!("{}: {};", d.property, d.value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Winning declaration for `property`: the last `!important` one, or the
/// last one when none is important.
pub fn winning<'a>(decls: &'a [Declaration], property: &str) -> Option<&'a Declaration> {
    decls
        .iter()
        .rev()
        .find(|d| d.important && d.property == property)
        .or_else(|| decls.iter().rev().find(|d| d.property == property))
}

/// Replace `property` in place (dropping duplicates) or append it.
pub fn set_declaration(decls: &mut Vec<Declaration>, property: &str, value: &str, important: bool) {
    let property = property.to_ascii_lowercase();
    let new = Declaration {
        property: property.clone(),
        value: value.to_string(),
        important,
    };
    match decls.iter().position(|d| d.property == property) {
        Some(first) => {
            decls[first] = new;
            let mut idx = 0usize;
            decls.retain(|d| {
                let keep = idx <= first || d.property != property;
                idx += 1;
                keep
            });
        }
        None => decls.push(new),
    }
}

/// Drop every declaration of `property`. Returns true when one was removed.
pub fn remove_declaration(decls: &mut Vec<Declaration>, property: &str) -> bool {
    let before = decls.len();
    decls.retain(|d| d.property != property);
    decls.len() != before
}

#[derive(Debug, Clone, PartialEq)]
/// Computed values the rules read.
pub struct ComputedStyle {
    pub color: String,
    pub background_color: String,
    pub font_size_px: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            color: INITIAL_COLOR.to_string(),
            background_color: INITIAL_BACKGROUND.to_string(),
            font_size_px: INITIAL_FONT_SIZE_PX,
        }
    }
}

impl ComputedStyle {
    /// Compute a child's style from its parent's and its raw `style` attribute.
    pub fn cascade(parent: &ComputedStyle, inline: &str) -> ComputedStyle {
        let specified = Specified::parse(inline);

        let font_size_px = match specified.font_size {
            Some(SizeSpec::Declared(size)) => {
                resolve_size(&size, parent.font_size_px).unwrap_or(parent.font_size_px)
            }
            Some(SizeSpec::Initial) => INITIAL_FONT_SIZE_PX,
            Some(SizeSpec::Inherit) | None => parent.font_size_px,
        };

        let color = match specified.color {
            Some(ColorSpec::Computed(c)) => c,
            Some(ColorSpec::Initial) => INITIAL_COLOR.to_string(),
            Some(ColorSpec::Inherit | ColorSpec::Unset | ColorSpec::CurrentColor) | None => {
                parent.color.clone()
            }
        };

        let background_color = match specified.background {
            Some(ColorSpec::Computed(c)) => c,
            Some(ColorSpec::Inherit) => parent.background_color.clone(),
            Some(ColorSpec::CurrentColor) => color.clone(),
            Some(ColorSpec::Initial | ColorSpec::Unset) | None => INITIAL_BACKGROUND.to_string(),
        };

        ComputedStyle {
            color,
            background_color,
            font_size_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ColorSpec {
    Computed(String),
    CurrentColor,
    Inherit,
    Initial,
    Unset,
}

#[derive(Debug, Clone)]
enum SizeSpec {
    Declared(FontSize),
    Inherit,
    Initial,
}

/// The winning specified values of one `style` attribute.
#[derive(Debug, Default)]
struct Specified {
    color: Option<ColorSpec>,
    background: Option<ColorSpec>,
    font_size: Option<SizeSpec>,
}

impl Specified {
    fn parse(inline: &str) -> Specified {
        let mut specified = Specified::default();
        if inline.trim().is_empty() {
            return specified;
        }
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        match StyleAttribute::parse(inline, options) {
            Ok(style) => {
                // important declarations are applied last so they win
                specified.collect(&style.declarations.declarations);
                specified.collect(&style.declarations.important_declarations);
            }
            Err(err) => tracing::debug!(style = inline, error = ?err, "unparsable style attribute"),
        }
        specified
    }

    fn collect(&mut self, properties: &[Property]) {
        for property in properties {
            match property {
                Property::Color(color) => self.color = Some(color_spec(color)),
                Property::BackgroundColor(color) => self.background = Some(color_spec(color)),
                Property::Background(layers) => {
                    if let Some(last) = layers.last() {
                        self.background = Some(color_spec(&last.color));
                    }
                }
                Property::FontSize(size) => self.font_size = Some(SizeSpec::Declared(size.clone())),
                Property::Unparsed(unparsed) => {
                    let Ok(raw) = property.value_to_css_string(PrinterOptions::default()) else {
                        continue;
                    };
                    let raw = raw.trim().to_ascii_lowercase();
                    match &unparsed.property_id {
                        PropertyId::Color => self.color = Some(raw_color_spec(raw)),
                        PropertyId::BackgroundColor | PropertyId::Background => {
                            self.background = Some(raw_color_spec(raw))
                        }
                        PropertyId::FontSize => match raw.as_str() {
                            "inherit" | "unset" => self.font_size = Some(SizeSpec::Inherit),
                            "initial" => self.font_size = Some(SizeSpec::Initial),
                            _ => {}
                        },
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }
}

fn color_spec(color: &CssColor) -> ColorSpec {
    match color {
        CssColor::CurrentColor => ColorSpec::CurrentColor,
        other => ColorSpec::Computed(computed_color(other)),
    }
}

/// Keywords and values lightningcss keeps as tokens (`var()`, unknown words).
fn raw_color_spec(raw: String) -> ColorSpec {
    match raw.as_str() {
        "inherit" => ColorSpec::Inherit,
        "initial" => ColorSpec::Initial,
        "unset" => ColorSpec::Unset,
        "currentcolor" => ColorSpec::CurrentColor,
        _ => ColorSpec::Computed(raw),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A colour resolved to 8-bit sRGB channels.
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Browser-style computed serialization.
    pub fn serialize(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha_string(self.a))
        }
    }
}

/// Shortest alpha (two, else three decimals) that maps back to the same byte.
fn alpha_string(alpha: u8) -> String {
    let exact = alpha as f64 / 255.0;
    let two = (exact * 100.0).round() / 100.0;
    if (two * 255.0).round() as u8 == alpha {
        two.to_string()
    } else {
        ((exact * 1000.0).round() / 1000.0).to_string()
    }
}

/// Resolve any sRGB-convertible colour (`rgb`, hex, named, `hsl`, `hwb`, ...).
pub fn resolve_color(color: &CssColor) -> Option<Rgba> {
    if let CssColor::RGBA(rgba) = color {
        return Some(Rgba {
            r: rgba.red,
            g: rgba.green,
            b: rgba.blue,
            a: rgba.alpha,
        });
    }
    let srgb = SRGB::try_from(color).ok()?;
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(Rgba {
        r: channel(srgb.r),
        g: channel(srgb.g),
        b: channel(srgb.b),
        a: channel(srgb.alpha),
    })
}

/// Computed string for a parsed colour; unresolvable ones keep their CSS text.
fn computed_color(color: &CssColor) -> String {
    match resolve_color(color) {
        Some(rgba) => rgba.serialize(),
        None => color
            .to_css_string(PrinterOptions::default())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default(),
    }
}

/// Normalize a declared colour to its computed string.
pub fn normalize_color(value: &str) -> String {
    ComputedStyle::cascade(&ComputedStyle::default(), &format!("color: {}", value)).color
}

fn absolute_font_size(size: AbsoluteFontSize) -> f64 {
    match size {
        AbsoluteFontSize::XXSmall => 9.0,
        AbsoluteFontSize::XSmall => 10.0,
        AbsoluteFontSize::Small => 13.0,
        AbsoluteFontSize::Medium => 16.0,
        AbsoluteFontSize::Large => 18.0,
        AbsoluteFontSize::XLarge => 24.0,
        AbsoluteFontSize::XXLarge => 32.0,
        AbsoluteFontSize::XXXLarge => 48.0,
    }
}

/// Resolve a parsed `font-size` against the parent's computed size.
fn resolve_size(size: &FontSize, parent_px: f64) -> Option<f64> {
    let px = match size {
        FontSize::Absolute(size) => absolute_font_size(*size),
        FontSize::Relative(RelativeFontSize::Smaller) => parent_px / 1.2,
        FontSize::Relative(RelativeFontSize::Larger) => parent_px * 1.2,
        FontSize::Length(LengthPercentage::Percentage(pct)) => pct.0 as f64 * parent_px,
        FontSize::Length(LengthPercentage::Dimension(length)) => match length {
            LengthValue::Em(v) => *v as f64 * parent_px,
            LengthValue::Rem(v) => *v as f64 * INITIAL_FONT_SIZE_PX,
            other => other.to_px()? as f64,
        },
        FontSize::Length(LengthPercentage::Calc(_)) => return None,
    };
    (px >= 0.0).then_some(px)
}

/// Resolve a declared `font-size` value against the parent's computed size.
pub fn resolve_font_size(value: &str, parent_px: f64) -> Option<f64> {
    match Specified::parse(&format!("font-size: {}", value)).font_size? {
        SizeSpec::Declared(size) => resolve_size(&size, parent_px),
        SizeSpec::Inherit => Some(parent_px),
        SizeSpec::Initial => Some(INITIAL_FONT_SIZE_PX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations_with_important() {
        let decls = parse_declarations("color: red; Background-Color:#fff !important;;bogus");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].property, "background-color");
        assert_eq!(decls[1].value, "#fff");
        assert!(decls[1].important);
    }

    #[test]
    fn test_set_and_remove_roundtrip_serialization() {
        let mut decls = parse_declarations("color: red; border: 4px solid red; color: blue");
        set_declaration(&mut decls, "color", "#000000", false);
        assert_eq!(serialize_declarations(&decls), "color: #000000; border: 4px solid red;");
        assert!(remove_declaration(&mut decls, "border"));
        assert!(!remove_declaration(&mut decls, "border"));
        assert_eq!(serialize_declarations(&decls), "color: #000000;");
    }

    #[test]
    fn test_important_beats_later_normal() {
        let decls = parse_declarations("color: red !important; color: blue");
        assert_eq!(winning(&decls, "color").unwrap().value, "red");
    }

    #[test]
    fn test_normalize_colors_like_computed_style() {
        assert_eq!(normalize_color("#0a0a0a"), "rgb(10, 10, 10)");
        assert_eq!(normalize_color("rgb(10,10,10)"), "rgb(10, 10, 10)");
        assert_eq!(normalize_color("RED"), "rgb(255, 0, 0)");
        assert_eq!(normalize_color("transparent"), "rgba(0, 0, 0, 0)");
        assert_eq!(normalize_color("rgba(0 0 255 / 50%)"), "rgba(0, 0, 255, 0.5)");
        assert_eq!(normalize_color("var(--Brand)"), "var(--brand)");
    }

    #[test]
    fn test_cascade_inherits_color_and_font_but_not_background() {
        let root = ComputedStyle::default();
        let parent = ComputedStyle::cascade(
            &root,
            "color: #111; background-color: #111; font-size: 10px",
        );
        assert_eq!(parent.color, parent.background_color);
        let child = ComputedStyle::cascade(&parent, "");
        assert_eq!(child.color, "rgb(17, 17, 17)");
        assert_eq!(child.background_color, INITIAL_BACKGROUND);
        assert_eq!(child.font_size_px, 10.0);
    }

    #[test]
    fn test_background_shorthand_picks_color_token() {
        let root = ComputedStyle::default();
        let s = ComputedStyle::cascade(&root, "background: url(a.png) no-repeat #ff0000");
        assert_eq!(s.background_color, "rgb(255, 0, 0)");
        let s = ComputedStyle::cascade(&root, "background: url(a.png)");
        assert_eq!(s.background_color, INITIAL_BACKGROUND);
    }

    #[test]
    fn test_named_hsl_and_rgb_compute_to_the_same_string() {
        assert_eq!(normalize_color("tomato"), "rgb(255, 99, 71)");
        assert_eq!(normalize_color("rgb(255, 99, 71)"), "rgb(255, 99, 71)");
        assert_eq!(normalize_color("darkorange"), "rgb(255, 140, 0)");
        assert_eq!(normalize_color("hsl(0, 100%, 50%)"), "rgb(255, 0, 0)");
        assert_eq!(normalize_color("rebeccapurple"), "rgb(102, 51, 153)");
    }

    #[test]
    fn test_cascade_keywords_and_importance() {
        let parent = ComputedStyle::cascade(&ComputedStyle::default(), "color: navy");
        let s = ComputedStyle::cascade(&parent, "color: inherit; background-color: currentColor");
        assert_eq!(s.color, "rgb(0, 0, 128)");
        assert_eq!(s.background_color, "rgb(0, 0, 128)");
        let s = ComputedStyle::cascade(&parent, "color: initial");
        assert_eq!(s.color, INITIAL_COLOR);
        let s = ComputedStyle::cascade(&parent, "color: red !important; color: blue");
        assert_eq!(s.color, "rgb(255, 0, 0)");
    }

    #[test]
    fn test_declarations_keep_data_urls_whole() {
        let decls = parse_declarations("background: url(\"data:image/png;base64,AA\"); color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url(\"data:image/png;base64,AA\")");
    }

    #[test]
    fn test_resolve_font_size_units() {
        assert_eq!(resolve_font_size("10px", 16.0), Some(10.0));
        assert_eq!(resolve_font_size("0.5em", 20.0), Some(10.0));
        assert_eq!(resolve_font_size("75%", 16.0), Some(12.0));
        assert_eq!(resolve_font_size("6pt", 16.0), Some(8.0));
        assert_eq!(resolve_font_size("x-small", 16.0), Some(10.0));
        assert_eq!(resolve_font_size("0", 16.0), Some(0.0));
        assert_eq!(resolve_font_size("inherit", 12.0), Some(12.0));
        assert_eq!(resolve_font_size("huge", 16.0), None);
        assert_eq!(resolve_font_size("-2px", 16.0), None);
    }
}
