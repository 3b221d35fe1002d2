//! Shared data models for scan results.

pub mod category;

pub use category::{FixTarget, IssueCategory, FIX_ALL_LABEL, PENALTY};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One detected defect. Never holds a node reference, only a description.
pub struct Finding {
    pub category: IssueCategory,
    pub message: String,
    /// Element description, or `None` for document-level findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Finding {
    pub fn new(category: IssueCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            target: None,
        }
    }

    pub fn at(mut self, target: String) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Occurrence count of one category.
pub struct IssueCount {
    #[serde(rename = "type")]
    pub category: IssueCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Score plus one count per category, in `IssueCategory::ALL` order.
pub struct ScanReport {
    pub score: u32,
    pub issues: Vec<IssueCount>,
}

impl ScanReport {
    pub fn count(&self, category: IssueCategory) -> usize {
        self.issues
            .iter()
            .find(|i| i.category == category)
            .map(|i| i.count)
            .unwrap_or(0)
    }

    pub fn total_findings(&self) -> usize {
        self.issues.iter().map(|i| i.count).sum()
    }
}
