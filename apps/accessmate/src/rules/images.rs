//! Images without an `alt` attribute.

use super::{clear_highlight, highlight};
use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};

pub const PLACEHOLDER_ALT: &str = "Placeholder alt text";
const BORDER: &str = "4px solid red";
const SELECTOR: &str = "img:not([alt])";

pub fn evaluate(doc: &Document, show: bool) -> Vec<Finding> {
    doc.select(SELECTOR)
        .into_iter()
        .map(|img| {
            if show {
                highlight(&img, BORDER);
            }
            Finding::new(IssueCategory::MissingAlt, "Image has no alt attribute.")
                .at(dom::describe(&img))
        })
        .collect()
}

pub fn fix(doc: &mut Document) -> usize {
    let images = doc.select(SELECTOR);
    for img in &images {
        dom::set_attr(img, "alt", PLACEHOLDER_ALT);
        clear_highlight(img);
    }
    images.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_alt_flagged_and_highlighted() {
        let doc = Document::parse(r#"<body><img src="a.png"><img src="b.png" alt=""></body>"#);
        let found = evaluate(&doc, true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target.as_deref(), Some("<img src=\"a.png\">"));
        let img = &doc.select("img").remove(0);
        assert_eq!(dom::style_property(img, "border").as_deref(), Some(BORDER));
    }

    #[test]
    fn test_fix_sets_placeholder_and_clears_border() {
        let mut doc = Document::parse(r#"<body><img src="a.png" style="border: 4px solid red"></body>"#);
        assert_eq!(fix(&mut doc), 1);
        let img = &doc.select("img").remove(0);
        assert_eq!(dom::attr(img, "alt").as_deref(), Some(PLACEHOLDER_ALT));
        assert_eq!(dom::style_property(img, "border"), None);
        assert!(evaluate(&doc, false).is_empty());
    }

    #[test]
    fn test_fix_is_idempotent() {
        let mut doc = Document::parse(r#"<body><img src="a.png"><img></body>"#);
        assert_eq!(fix(&mut doc), 2);
        let once = doc.to_html();
        assert_eq!(fix(&mut doc), 0);
        assert_eq!(doc.to_html(), once);
    }
}
