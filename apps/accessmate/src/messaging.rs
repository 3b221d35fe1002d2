//! Popup to page message contract.
//!
//! The page side (`ContentScript`) owns a `Document` and answers
//! `Request`s. The control side (`Popup`) talks to it through a `Tab`,
//! which may turn out to be unreachable (restricted pages).

use crate::dom::Document;
use crate::error::Result;
use crate::filters::{self, ColorVisionMode};
use crate::fix;
use crate::media;
use crate::models::{FixTarget, ScanReport, FIX_ALL_LABEL};
use crate::scan::{self, ScanOptions};
use crate::settings::SettingsStore;
use serde::{Deserialize, Serialize};

/// One message, tagged by `action` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    RunAccessibilityCheck {
        #[serde(rename = "autoFix", default)]
        auto_fix: bool,
    },
    /// A missing `issueType` is a no-op.
    FixIssue {
        #[serde(rename = "issueType", default)]
        issue_type: Option<String>,
    },
    FixProtanopiaColors,
    FixDeuteranopiaColors,
    FixTritanopiaColors,
    StopAutoPlayVideos,
}

impl Request {
    pub fn color_mode(mode: ColorVisionMode) -> Self {
        match mode {
            ColorVisionMode::Protanopia => Request::FixProtanopiaColors,
            ColorVisionMode::Deuteranopia => Request::FixDeuteranopiaColors,
            ColorVisionMode::Tritanopia => Request::FixTritanopiaColors,
        }
    }

    pub fn mode(&self) -> Option<ColorVisionMode> {
        match self {
            Request::FixProtanopiaColors => Some(ColorVisionMode::Protanopia),
            Request::FixDeuteranopiaColors => Some(ColorVisionMode::Deuteranopia),
            Request::FixTritanopiaColors => Some(ColorVisionMode::Tritanopia),
            _ => None,
        }
    }
}

/// Outcome of sending a request to a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Reply(ScanReport),
    Delivered,
    Unreachable,
}

pub trait Tab {
    fn send(&mut self, request: Request) -> Delivery;
}

/// A tab the page script cannot run in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableTab;

impl Tab for UnreachableTab {
    fn send(&mut self, request: Request) -> Delivery {
        tracing::debug!(?request, "tab unreachable");
        Delivery::Unreachable
    }
}

/// Page-side handler.
pub struct ContentScript {
    doc: Document,
    options: ScanOptions,
    threshold: f64,
}

impl ContentScript {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            options: ScanOptions::default(),
            threshold: crate::color::DEFAULT_NEAR_THRESHOLD,
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Handle one request. Only a check produces a reply.
    pub fn handle(&mut self, request: Request) -> Option<ScanReport> {
        match request {
            Request::RunAccessibilityCheck { auto_fix } => {
                Some(scan::scan(&mut self.doc, auto_fix, &self.options))
            }
            Request::FixIssue { issue_type: None } => {
                tracing::warn!("ignoring fix request without issueType");
                None
            }
            Request::FixIssue {
                issue_type: Some(issue_type),
            } => {
                match issue_type.parse::<FixTarget>() {
                    Ok(target) => {
                        fix::apply(&mut self.doc, target);
                    }
                    Err(e) => tracing::warn!(error = %e, "ignoring fix request"),
                }
                None
            }
            Request::StopAutoPlayVideos => {
                media::stop_autoplay(&mut self.doc);
                None
            }
            other => {
                if let Some(mode) = other.mode() {
                    filters::apply(&mut self.doc, mode, self.threshold);
                }
                None
            }
        }
    }

    /// Decode one JSON request and encode the reply, if any.
    pub fn handle_json(&mut self, line: &str) -> Result<Option<String>> {
        let request: Request = serde_json::from_str(line)?;
        match self.handle(request) {
            Some(report) => Ok(Some(serde_json::to_string(&report)?)),
            None => Ok(None),
        }
    }
}

impl Tab for ContentScript {
    fn send(&mut self, request: Request) -> Delivery {
        match self.handle(request) {
            Some(report) => Delivery::Reply(report),
            None => Delivery::Delivered,
        }
    }
}

/// Control-side actions.
pub struct Popup<T: Tab> {
    tab: T,
    settings: SettingsStore,
    mode: Option<ColorVisionMode>,
}

impl<T: Tab> Popup<T> {
    pub fn new(tab: T, settings: SettingsStore) -> Self {
        Self {
            tab,
            settings,
            mode: None,
        }
    }

    pub fn tab(&self) -> &T {
        &self.tab
    }

    pub fn into_tab(self) -> T {
        self.tab
    }

    pub fn mode(&self) -> Option<ColorVisionMode> {
        self.mode
    }

    pub fn auto_fix(&self) -> bool {
        self.settings.auto_fix()
    }

    /// Run a check with the persisted auto-fix flag. `None` when the page
    /// cannot be reached.
    pub fn check_accessibility(&mut self) -> Option<ScanReport> {
        let auto_fix = self.settings.auto_fix();
        match self.tab.send(Request::RunAccessibilityCheck { auto_fix }) {
            Delivery::Reply(report) => Some(report),
            Delivery::Delivered => None,
            Delivery::Unreachable => {
                tracing::info!("accessibility check unavailable on this page");
                None
            }
        }
    }

    pub fn fix_issue(&mut self, issue_type: &str) -> Delivery {
        self.tab.send(Request::FixIssue {
            issue_type: Some(issue_type.to_string()),
        })
    }

    pub fn fix_all(&mut self) -> Delivery {
        self.fix_issue(FIX_ALL_LABEL)
    }

    /// Remember the selection and apply it. Clearing the selection sends
    /// nothing and returns `None`.
    pub fn select_mode(&mut self, mode: Option<ColorVisionMode>) -> Option<Delivery> {
        self.mode = mode;
        mode.map(|m| self.tab.send(Request::color_mode(m)))
    }

    pub fn toggle_auto_fix(&mut self) -> Result<bool> {
        self.settings.toggle_auto_fix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueCategory;
    use tempfile::tempdir;

    const PAGE: &str = r#"<body><h1>T</h1><img src="a.png"><p style="color: red">x</p></body>"#;

    #[test]
    fn test_wire_format() {
        let req: Request = serde_json::from_str(r#"{"action":"runAccessibilityCheck"}"#).unwrap();
        assert_eq!(req, Request::RunAccessibilityCheck { auto_fix: false });
        let req: Request =
            serde_json::from_str(r#"{"action":"fixIssue","issueType":"Fix All"}"#).unwrap();
        assert_eq!(
            req,
            Request::FixIssue {
                issue_type: Some("Fix All".into())
            }
        );
        let req: Request = serde_json::from_str(r#"{"action":"fixIssue"}"#).unwrap();
        assert_eq!(req, Request::FixIssue { issue_type: None });
        let req: Request = serde_json::from_str(r#"{"action":"stopAutoPlayVideos"}"#).unwrap();
        assert_eq!(req, Request::StopAutoPlayVideos);
        let encoded = serde_json::to_string(&Request::FixTritanopiaColors).unwrap();
        assert_eq!(encoded, r#"{"action":"fixTritanopiaColors"}"#);
    }

    #[test]
    fn test_handle_json_check_reply() {
        let mut cs = ContentScript::new(Document::parse(PAGE));
        let reply = cs
            .handle_json(r#"{"action":"runAccessibilityCheck","autoFix":false}"#)
            .unwrap()
            .unwrap();
        let v: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(v["score"], 98);
        assert_eq!(v["issues"][0]["type"], "Missing alt attribute");
        assert_eq!(v["issues"][0]["count"], 1);
        assert_eq!(v["issues"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_handle_json_rejects_malformed() {
        let mut cs = ContentScript::new(Document::parse(PAGE));
        assert!(cs.handle_json("{oops").is_err());
        assert!(cs.handle_json(r#"{"action":"reboot"}"#).is_err());
    }

    #[test]
    fn test_unknown_issue_type_is_ignored() {
        let mut cs = ContentScript::new(Document::parse(PAGE));
        let before = cs.document().to_html();
        let delivery = cs.send(Request::FixIssue {
            issue_type: Some("Blink tags".into()),
        });
        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(cs.document().to_html(), before);
    }

    #[test]
    fn test_fix_issue_without_type_is_a_no_op() {
        let mut cs = ContentScript::new(Document::parse(PAGE));
        let before = cs.document().to_html();
        assert_eq!(cs.handle_json(r#"{"action":"fixIssue"}"#).unwrap(), None);
        assert_eq!(cs.document().to_html(), before);
    }

    #[test]
    fn test_stop_autoplay_request() {
        let mut cs = ContentScript::new(Document::parse(
            r#"<body><video src="v.mp4" autoplay></video></body>"#,
        ));
        assert_eq!(cs.handle_json(r#"{"action":"stopAutoPlayVideos"}"#).unwrap(), None);
        let video = cs.document().select("video").remove(0);
        assert!(!crate::dom::has_attr(&video, "autoplay"));
        assert!(crate::dom::has_attr(&video, "controls"));
    }

    #[test]
    fn test_popup_against_unreachable_tab() {
        let td = tempdir().unwrap();
        let mut popup = Popup::new(UnreachableTab, SettingsStore::open(td.path()));
        assert_eq!(popup.check_accessibility(), None);
        assert_eq!(popup.fix_all(), Delivery::Unreachable);
    }

    #[test]
    fn test_popup_uses_persisted_auto_fix() {
        let td = tempdir().unwrap();
        let tab = ContentScript::new(Document::parse(PAGE));
        let mut popup = Popup::new(tab, SettingsStore::open(td.path()));

        let report = popup.check_accessibility().unwrap();
        assert_eq!(report.count(IssueCategory::MissingAlt), 1);

        assert!(popup.toggle_auto_fix().unwrap());
        let report = popup.check_accessibility().unwrap();
        assert_eq!(report.count(IssueCategory::MissingAlt), 0);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_popup_fix_issue_by_label() {
        let td = tempdir().unwrap();
        let tab = ContentScript::new(Document::parse(PAGE));
        let mut popup = Popup::new(tab, SettingsStore::open(td.path()));
        assert_eq!(popup.fix_issue("Missing alt attribute"), Delivery::Delivered);
        assert_eq!(popup.check_accessibility().unwrap().score, 100);
    }

    #[test]
    fn test_select_mode_remaps_page() {
        let td = tempdir().unwrap();
        let tab = ContentScript::new(Document::parse(PAGE));
        let mut popup = Popup::new(tab, SettingsStore::open(td.path()));
        assert_eq!(popup.select_mode(None), None);
        assert_eq!(
            popup.select_mode(Some(ColorVisionMode::Protanopia)),
            Some(Delivery::Delivered)
        );
        assert_eq!(popup.mode(), Some(ColorVisionMode::Protanopia));
        let doc = popup.into_tab().into_document();
        let p = doc.select("p").remove(0);
        assert_eq!(doc.computed_style(&p).color, "rgb(0, 0, 255)");
    }
}
