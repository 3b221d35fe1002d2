//! Rule evaluators and remediators, one module per issue family.
//!
//! Evaluators only read semantics; with `highlight` on they may add a
//! border to flagged elements. Remediators rewrite attributes, text and
//! structure and return how many elements they changed. Both re-query the
//! document on every call.

pub mod contrast;
pub mod fonts;
pub mod forms;
pub mod headings;
pub mod images;
pub mod links;

use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};
use kuchiki::NodeRef;

/// Run the evaluator for `category`.
pub fn evaluate(category: IssueCategory, doc: &Document, highlight: bool) -> Vec<Finding> {
    match category {
        IssueCategory::MissingAlt => images::evaluate(doc, highlight),
        IssueCategory::LowContrast => contrast::evaluate(doc),
        IssueCategory::MissingFormLabel => forms::evaluate(doc),
        IssueCategory::HeadingHierarchy => headings::evaluate(doc, highlight),
        IssueCategory::SmallFont => fonts::evaluate(doc),
        IssueCategory::MissingPdfDescription => links::evaluate_pdf(doc, highlight),
        IssueCategory::MissingLinkLabel => links::evaluate_links(doc, highlight),
    }
}

/// Run the remediator for `category`; returns the number of changed elements.
pub fn remediate(category: IssueCategory, doc: &mut Document) -> usize {
    let changed = match category {
        IssueCategory::MissingAlt => images::fix(doc),
        IssueCategory::LowContrast => contrast::fix(doc),
        IssueCategory::MissingFormLabel => forms::fix(doc),
        IssueCategory::HeadingHierarchy => headings::fix(doc),
        IssueCategory::SmallFont => fonts::fix(doc),
        IssueCategory::MissingPdfDescription => links::fix_pdf(doc),
        IssueCategory::MissingLinkLabel => links::fix_links(doc),
    };
    tracing::debug!(category = category.id(), changed, "remediator finished");
    changed
}

pub(crate) fn highlight(node: &NodeRef, border: &str) {
    dom::set_style_property(node, "border", border, false);
}

pub(crate) fn clear_highlight(node: &NodeRef) {
    dom::remove_style_property(node, "border");
}
