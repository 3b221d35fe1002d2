//! Links and embedded PDFs without an accessible description.

use super::{clear_highlight, highlight};
use crate::dom::{self, Document};
use crate::models::{Finding, IssueCategory};
use kuchiki::NodeRef;

pub const PLACEHOLDER_PDF: &str = "PDF document";
pub const PLACEHOLDER_LINK: &str = "Link";
const BORDER_PDF: &str = "2px dashed red";
const BORDER_LINK: &str = "2px dashed blue";

/// `.pdf` path suffix, case-insensitive, ignoring query and fragment.
pub fn is_pdf_url(url: &str) -> bool {
    let url = url.trim();
    let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
    url[..end].to_ascii_lowercase().ends_with(".pdf")
}

fn is_pdf_type(node: &NodeRef) -> bool {
    dom::attr(node, "type")
        .map(|t| t.trim().eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false)
}

fn undescribed(node: &NodeRef) -> bool {
    dom::trimmed_text(node).is_empty() && !dom::has_nonblank_attr(node, "aria-label")
}

fn pdf_anchor(node: &NodeRef) -> bool {
    dom::attr(node, "href").map(|h| is_pdf_url(&h)).unwrap_or(false)
}

/// Undescribed PDF anchors, objects and embeds, in document order.
fn pdf_targets(doc: &Document) -> Vec<NodeRef> {
    doc.select("a[href], object, embed")
        .into_iter()
        .filter(|node| {
            let is_pdf = match dom::tag_name(node).as_deref() {
                Some("a") => pdf_anchor(node),
                Some("object") => {
                    dom::attr(node, "data").map(|d| is_pdf_url(&d)).unwrap_or(false)
                        || is_pdf_type(node)
                }
                Some("embed") => {
                    dom::attr(node, "src").map(|s| is_pdf_url(&s)).unwrap_or(false)
                        || is_pdf_type(node)
                }
                _ => false,
            };
            is_pdf && undescribed(node)
        })
        .collect()
}

fn link_targets(doc: &Document) -> Vec<NodeRef> {
    doc.select("a[href]")
        .into_iter()
        .filter(|a| !pdf_anchor(a) && undescribed(a))
        .collect()
}

pub fn evaluate_pdf(doc: &Document, show: bool) -> Vec<Finding> {
    pdf_targets(doc)
        .iter()
        .map(|node| {
            if show {
                highlight(node, BORDER_PDF);
            }
            Finding::new(
                IssueCategory::MissingPdfDescription,
                "PDF has no text or aria-label.",
            )
            .at(dom::describe(node))
        })
        .collect()
}

pub fn evaluate_links(doc: &Document, show: bool) -> Vec<Finding> {
    link_targets(doc)
        .iter()
        .map(|a| {
            if show {
                highlight(a, BORDER_LINK);
            }
            Finding::new(IssueCategory::MissingLinkLabel, "Link has no text or aria-label.")
                .at(dom::describe(a))
        })
        .collect()
}

/// Give `node` a label; anchors also get visible text. Existing children
/// (icons, images) are kept.
fn describe_with(node: &NodeRef, placeholder: &str) {
    if dom::tag_name(node).as_deref() == Some("a") {
        node.append(NodeRef::new_text(placeholder));
    }
    dom::set_attr(node, "aria-label", placeholder);
    clear_highlight(node);
}

pub fn fix_pdf(doc: &mut Document) -> usize {
    let targets = pdf_targets(doc);
    for node in &targets {
        describe_with(node, PLACEHOLDER_PDF);
    }
    targets.len()
}

pub fn fix_links(doc: &mut Document) -> usize {
    let targets = link_targets(doc);
    for a in &targets {
        describe_with(a, PLACEHOLDER_LINK);
    }
    targets.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<body>
        <a href="/files/Report.PDF?v=2"></a>
        <a href="/files/ok.pdf">Annual report</a>
        <object data="doc.pdf"></object>
        <embed type="application/pdf" src="/viewer">
        <a href="/home"><img src="home.svg"></a>
        <a href="/about" aria-label="About us"></a>
        <a href="/contact">Contact</a>
        <a name="anchor-only"></a>
    </body>"#;

    #[test]
    fn test_pdf_url_matching() {
        assert!(is_pdf_url("a.pdf"));
        assert!(is_pdf_url(" /x/A.PDF#page=2 "));
        assert!(!is_pdf_url("/pdf/index.html"));
        assert!(!is_pdf_url("a.pdf.html"));
    }

    #[test]
    fn test_counts_split_between_pdf_and_link() {
        let doc = Document::parse(PAGE);
        assert_eq!(evaluate_pdf(&doc, false).len(), 3);
        assert_eq!(evaluate_links(&doc, false).len(), 1);
    }

    #[test]
    fn test_highlights_use_dashed_borders() {
        let doc = Document::parse(PAGE);
        evaluate_pdf(&doc, true);
        evaluate_links(&doc, true);
        let anchors = doc.select("a");
        assert_eq!(
            dom::style_property(&anchors[0], "border").as_deref(),
            Some(BORDER_PDF)
        );
        assert_eq!(
            dom::style_property(&anchors[2], "border").as_deref(),
            Some(BORDER_LINK)
        );
    }

    #[test]
    fn test_fixes_label_and_keep_children() {
        let mut doc = Document::parse(PAGE);
        evaluate_pdf(&doc, true);
        assert_eq!(fix_pdf(&mut doc), 3);
        assert_eq!(fix_links(&mut doc), 1);
        assert!(evaluate_pdf(&doc, false).is_empty());
        assert!(evaluate_links(&doc, false).is_empty());

        let anchors = doc.select("a");
        assert_eq!(dom::trimmed_text(&anchors[0]), PLACEHOLDER_PDF);
        assert_eq!(dom::attr(&anchors[0], "aria-label").as_deref(), Some(PLACEHOLDER_PDF));
        assert_eq!(dom::style_property(&anchors[0], "border"), None);
        assert_eq!(dom::trimmed_text(&anchors[2]), PLACEHOLDER_LINK);
        assert_eq!(doc.select("a img").len(), 1);

        let object = doc.select("object").remove(0);
        assert_eq!(dom::attr(&object, "aria-label").as_deref(), Some(PLACEHOLDER_PDF));
        assert_eq!(dom::trimmed_text(&object), "");
    }
}
