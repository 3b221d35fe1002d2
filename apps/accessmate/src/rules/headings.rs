//! Heading hierarchy: one `<h1>`, no skipped levels, no empty headings.
//!
//! The evaluator walks `h1`..`h6` in document order carrying the previous
//! level and the number of `<h1>`s seen. `previous` is updated after every
//! heading, flagged or not.
//!
//! The remediator mirrors that walk over a snapshot taken at the start of
//! the pass, with three differences that make one pass sufficient:
//! - empty headings are removed and leave the walk state untouched;
//! - `previous` tracks the level actually written, not the original one;
//! - when the page has no non-empty `<h1>`, the walk starts as if one
//!   preceded every heading, and that `<h1>` is inserted at the end.

use super::{clear_highlight, highlight};
use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};
use kuchiki::NodeRef;

pub const PLACEHOLDER_H1: &str = "Untitled Page";
const SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const BORDER_MULTIPLE_H1: &str = "3px solid orange";
const BORDER_SKIPPED: &str = "3px solid red";
const BORDER_EMPTY: &str = "3px solid purple";

fn heading_level(node: &NodeRef) -> Option<u8> {
    let tag = dom::tag_name(node)?;
    let digit = tag.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&digit).then_some(digit)
}

pub fn evaluate(doc: &Document, show: bool) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut previous: u8 = 0;
    let mut h1_count = 0usize;

    for heading in doc.select(SELECTOR) {
        let Some(level) = heading_level(&heading) else {
            continue;
        };
        let text = dom::trimmed_text(&heading);
        let mut flag = |message: String, border: &str| {
            if show {
                highlight(&heading, border);
            }
            findings.push(
                Finding::new(IssueCategory::HeadingHierarchy, message).at(dom::describe(&heading)),
            );
        };

        if level == 1 {
            h1_count += 1;
            if h1_count > 1 {
                flag("Multiple <h1> elements found.".to_string(), BORDER_MULTIPLE_H1);
            }
        }
        if previous > 0 && level > previous + 1 {
            flag(
                format!("Heading level skipped: <h{}> → <h{}>.", previous, level),
                BORDER_SKIPPED,
            );
        }
        if text.is_empty() {
            flag(format!("Empty heading <h{}> found.", level), BORDER_EMPTY);
        }
        previous = level;
    }

    if h1_count == 0 {
        findings.push(Finding::new(
            IssueCategory::HeadingHierarchy,
            "No <h1> element found on the page.",
        ));
    }
    findings
}

pub fn fix(doc: &mut Document) -> usize {
    tracing::info!("fixing heading hierarchy");
    let headings: Vec<(NodeRef, u8)> = doc
        .select(SELECTOR)
        .into_iter()
        .filter_map(|h| heading_level(&h).map(|lvl| (h, lvl)))
        .collect();
    let has_h1 = headings
        .iter()
        .any(|(h, lvl)| *lvl == 1 && !dom::trimmed_text(h).is_empty());

    let mut changed = 0usize;
    let mut previous: u8 = if has_h1 { 0 } else { 1 };
    let mut h1_count = 0usize;

    for (heading, level) in headings {
        if dom::trimmed_text(&heading).is_empty() {
            tracing::debug!(level, "removing empty heading");
            heading.detach();
            changed += 1;
            continue;
        }

        let mut target = level;
        if level == 1 {
            h1_count += 1;
            if h1_count > 1 {
                target = 2;
            }
        }
        if previous > 0 && target > previous + 1 {
            target = previous + 1;
        }

        if target != level {
            tracing::debug!(from = level, to = target, "re-levelling heading");
            let replacement = doc.rename_element(&heading, &format!("h{}", target));
            clear_highlight(&replacement);
            changed += 1;
        }
        previous = target;
    }

    if !has_h1 {
        let h1 = doc.create_element("h1");
        dom::set_text(&h1, PLACEHOLDER_H1);
        if doc.prepend_to_body(h1) {
            tracing::debug!("inserted missing <h1>");
            changed += 1;
        }
    }
    changed
}
