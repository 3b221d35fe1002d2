//! Inputs with no accessible-name hook.

use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};

pub const PLACEHOLDER_LABEL: &str = "Unnamed Input Field";
const SELECTOR: &str = "input:not([aria-label]):not([aria-labelledby]):not([id])";

pub fn evaluate(doc: &Document) -> Vec<Finding> {
    doc.select(SELECTOR)
        .iter()
        .map(|input| {
            Finding::new(
                IssueCategory::MissingFormLabel,
                "Input has no aria-label, aria-labelledby or id.",
            )
            .at(dom::describe(input))
        })
        .collect()
}

pub fn fix(doc: &mut Document) -> usize {
    let inputs = doc.select(SELECTOR);
    for input in &inputs {
        dom::set_attr(input, "aria-label", PLACEHOLDER_LABEL);
    }
    inputs.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_hook_counts_as_labelled() {
        let mut doc = Document::parse(
            r#"<body>
                <input type="text">
                <input id="email">
                <input aria-label="Search">
                <input aria-labelledby="lbl">
            </body>"#,
        );
        assert_eq!(evaluate(&doc).len(), 1);
        assert_eq!(fix(&mut doc), 1);
        assert!(evaluate(&doc).is_empty());
        let first = &doc.select("input").remove(0);
        assert_eq!(dom::attr(first, "aria-label").as_deref(), Some(PLACEHOLDER_LABEL));
    }
}
