//! Remediation entry points: one category or all of them.

use crate::dom::Document;
use crate::models::{FixTarget, IssueCategory};
use crate::rules;

/// Apply the remediator(s) for `target`. Returns the number of changed
/// elements.
pub fn apply(doc: &mut Document, target: FixTarget) -> usize {
    match target {
        FixTarget::All => fix_all(doc),
        FixTarget::Category(category) => rules::remediate(category, doc),
    }
}

/// Run every remediator once: alt text, contrast, form labels, headings,
/// small fonts, PDF descriptions, link labels.
pub fn fix_all(doc: &mut Document) -> usize {
    let changed = IssueCategory::ALL
        .into_iter()
        .map(|category| rules::remediate(category, doc))
        .sum();
    tracing::info!(changed, "applied all fixes");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{scan, ScanOptions};

    const PAGE: &str = r#"<html><body>
        <h3></h3>
        <h2>Section</h2>
        <img src="logo.png">
        <p style="color: #222; background-color: #222">hidden</p>
        <input type="text">
        <small style="font-size: 9px">fine print</small>
        <a href="/terms.pdf"></a>
        <a href="/next"></a>
    </body></html>"#;

    #[test]
    fn test_fix_all_clears_every_category() {
        let mut doc = Document::parse(PAGE);
        let before = scan(&mut doc, false, &ScanOptions::default());
        for category in IssueCategory::ALL {
            assert!(before.count(category) > 0, "{} not detected", category);
        }

        apply(&mut doc, FixTarget::All);
        let after = scan(&mut doc, false, &ScanOptions::default());
        assert_eq!(after.total_findings(), 0, "{:?}", after);
        assert_eq!(after.score, 100);
    }

    #[test]
    fn test_single_category_leaves_others() {
        let mut doc = Document::parse(PAGE);
        let changed = apply(&mut doc, FixTarget::Category(IssueCategory::MissingFormLabel));
        assert_eq!(changed, 1);
        let report = scan(&mut doc, false, &ScanOptions::default());
        assert_eq!(report.count(IssueCategory::MissingFormLabel), 0);
        assert_eq!(report.count(IssueCategory::MissingAlt), 1);
    }
}
