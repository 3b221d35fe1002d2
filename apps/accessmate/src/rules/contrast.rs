//! Text whose computed colour equals its computed background.
//!
//! Equality is on the computed strings, not perceptual distance.

use crate::color;
use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};
use kuchiki::NodeRef;

fn same_colors(doc: &Document) -> Vec<(NodeRef, String)> {
    doc.elements()
        .into_iter()
        .filter_map(|el| {
            let cs = doc.computed_style(&el);
            (cs.color == cs.background_color).then_some((el, cs.background_color))
        })
        .collect()
}

pub fn evaluate(doc: &Document) -> Vec<Finding> {
    same_colors(doc)
        .into_iter()
        .map(|(el, bg)| {
            Finding::new(
                IssueCategory::LowContrast,
                format!("Text color matches background ({}).", bg),
            )
            .at(dom::describe(&el))
        })
        .collect()
}

/// Switch text to black or white depending on background luminance.
/// Elements whose background cannot be parsed are left alone.
pub fn fix(doc: &mut Document) -> usize {
    let mut changed = 0;
    for el in doc.elements() {
        // Re-read per element: an ancestor fixed earlier changes inherited colour.
        let cs = doc.computed_style(&el);
        if cs.color != cs.background_color {
            continue;
        }
        match color::parse_color(&cs.background_color) {
            Some(bg) => {
                dom::set_style_property(&el, "color", color::readable_foreground(bg), false);
                changed += 1;
            }
            None => {
                tracing::debug!(
                    element = %dom::describe(&el),
                    background = %cs.background_color,
                    "skipping contrast fix for unparsable background"
                );
            }
        }
    }
    changed
}
