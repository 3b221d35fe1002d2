//! Scan orchestration: run every evaluator over one document and fold the
//! findings into a `ScanReport`.

use crate::dom::Document;
use crate::fix;
use crate::models::{Finding, IssueCategory, IssueCount, ScanReport};
use crate::rules;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Outline flagged elements with a border while scanning.
    pub highlight: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { highlight: true }
    }
}

/// Scan `doc`, optionally running every remediator first so the report
/// reflects the fixed page.
pub fn scan(doc: &mut Document, auto_fix: bool, options: &ScanOptions) -> ScanReport {
    if auto_fix {
        fix::fix_all(doc);
    }
    let report = fold(&audit(doc, options));
    tracing::info!(score = report.score, findings = report.total_findings(), "scan complete");
    report
}

/// Every finding of every evaluator, in category order.
pub fn audit(doc: &Document, options: &ScanOptions) -> Vec<Finding> {
    IssueCategory::ALL
        .into_iter()
        .flat_map(|category| rules::evaluate(category, doc, options.highlight))
        .collect()
}

/// Fold findings into counts. Every category is present, zero or not, and
/// the score is `max(0, 100 - total penalty)`.
pub fn fold(findings: &[Finding]) -> ScanReport {
    let mut issues: Vec<IssueCount> = IssueCategory::ALL
        .into_iter()
        .map(|category| IssueCount { category, count: 0 })
        .collect();
    let mut penalty: u32 = 0;
    for finding in findings {
        if let Some(slot) = issues.iter_mut().find(|i| i.category == finding.category) {
            slot.count += 1;
        }
        penalty = penalty.saturating_add(finding.category.penalty());
    }
    ScanReport {
        score: 100u32.saturating_sub(penalty),
        issues,
    }
}
