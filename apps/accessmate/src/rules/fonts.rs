//! Computed font sizes below the readable minimum.

use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};

pub const MIN_FONT_PX: f64 = 12.0;

fn too_small(px: f64) -> bool {
    px > 0.0 && px < MIN_FONT_PX
}

pub fn evaluate(doc: &Document) -> Vec<Finding> {
    doc.elements()
        .into_iter()
        .filter_map(|el| {
            let px = doc.computed_style(&el).font_size_px;
            too_small(px).then(|| {
                Finding::new(
                    IssueCategory::SmallFont,
                    format!("Font size {}px is below {}px.", trim_px(px), MIN_FONT_PX),
                )
                .at(dom::describe(&el))
            })
        })
        .collect()
}

pub fn fix(doc: &mut Document) -> usize {
    let mut changed = 0;
    for el in doc.elements() {
        if too_small(doc.computed_style(&el).font_size_px) {
            dom::set_style_property(&el, "font-size", "12px", false);
            changed += 1;
        }
    }
    changed
}

fn trim_px(px: f64) -> String {
    let s = format!("{:.2}", px);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
