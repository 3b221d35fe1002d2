//! Issue categories and fix targets.
//!
//! Categories are a closed set. Strings (wire labels, CLI ids) are parsed
//! into `IssueCategory`/`FixTarget` once at the boundary and dispatched by
//! exhaustive `match` from then on.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Score deduction for every finding.
pub const PENALTY: u32 = 2;

/// Literal sent by the popup's "Fix All" button.
pub const FIX_ALL_LABEL: &str = "Fix All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "Missing alt attribute")]
    MissingAlt,
    #[serde(rename = "Low contrast detected")]
    LowContrast,
    #[serde(rename = "Form input without a label")]
    MissingFormLabel,
    #[serde(rename = "Heading hierarchy issues")]
    HeadingHierarchy,
    #[serde(rename = "Font size too small")]
    SmallFont,
    #[serde(rename = "PDF without a description")]
    MissingPdfDescription,
    #[serde(rename = "Link without a label")]
    MissingLinkLabel,
}

impl IssueCategory {
    /// Report order, which is also the order `fix_all` runs remediators in.
    pub const ALL: [IssueCategory; 7] = [
        IssueCategory::MissingAlt,
        IssueCategory::LowContrast,
        IssueCategory::MissingFormLabel,
        IssueCategory::HeadingHierarchy,
        IssueCategory::SmallFont,
        IssueCategory::MissingPdfDescription,
        IssueCategory::MissingLinkLabel,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            IssueCategory::MissingAlt => "missing-alt",
            IssueCategory::LowContrast => "low-contrast",
            IssueCategory::MissingFormLabel => "missing-form-label",
            IssueCategory::HeadingHierarchy => "heading-hierarchy",
            IssueCategory::SmallFont => "small-font",
            IssueCategory::MissingPdfDescription => "missing-pdf-description",
            IssueCategory::MissingLinkLabel => "missing-link-label",
        }
    }

    /// Human label; this is the `type` string on the wire.
    pub const fn label(self) -> &'static str {
        match self {
            IssueCategory::MissingAlt => "Missing alt attribute",
            IssueCategory::LowContrast => "Low contrast detected",
            IssueCategory::MissingFormLabel => "Form input without a label",
            IssueCategory::HeadingHierarchy => "Heading hierarchy issues",
            IssueCategory::SmallFont => "Font size too small",
            IssueCategory::MissingPdfDescription => "PDF without a description",
            IssueCategory::MissingLinkLabel => "Link without a label",
        }
    }

    pub const fn penalty(self) -> u32 {
        PENALTY
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IssueCategory {
    type Err = Error;

    /// Accepts the wire label or the kebab id, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        IssueCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownIssueType(s.to_string()))
    }
}

/// What a fix request applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixTarget {
    All,
    Category(IssueCategory),
}

impl FromStr for FixTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case(FIX_ALL_LABEL) || needle.eq_ignore_ascii_case("all") {
            return Ok(FixTarget::All);
        }
        needle.parse().map(FixTarget::Category)
    }
}

impl From<IssueCategory> for FixTarget {
    fn from(c: IssueCategory) -> Self {
        FixTarget::Category(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_ids_parse_back() {
        for c in IssueCategory::ALL {
            assert_eq!(c.label().parse::<IssueCategory>().unwrap(), c);
            assert_eq!(c.id().parse::<IssueCategory>().unwrap(), c);
            assert_eq!(c.penalty(), 2);
        }
    }

    #[test]
    fn test_serde_uses_label() {
        let s = serde_json::to_string(&IssueCategory::MissingAlt).unwrap();
        assert_eq!(s, "\"Missing alt attribute\"");
    }

    #[test]
    fn test_fix_target_parsing() {
        assert_eq!("Fix All".parse::<FixTarget>().unwrap(), FixTarget::All);
        assert_eq!("all".parse::<FixTarget>().unwrap(), FixTarget::All);
        assert_eq!(
            "Low contrast detected".parse::<FixTarget>().unwrap(),
            FixTarget::Category(IssueCategory::LowContrast)
        );
        let err = "Blink tags".parse::<FixTarget>().unwrap_err();
        assert!(matches!(err, Error::UnknownIssueType(ref s) if s == "Blink tags"));
    }
}
