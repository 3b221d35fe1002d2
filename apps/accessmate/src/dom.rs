//! Document handle over a `kuchiki` tree.
//!
//! Every evaluator, remediator and filter receives a `Document` explicitly.
//! Queries always walk the live tree, so a remediator never works from a
//! node list cached by an earlier pass.

use crate::error::Result;
use crate::style::{self, ComputedStyle};
use html5ever::{LocalName, Namespace, QualName};
use kuchiki::traits::*;
use kuchiki::NodeRef;
use std::fs;
use std::path::Path;

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

pub struct Document {
    root: NodeRef,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
        }
    }

    /// Read a page from disk. Bytes that are not UTF-8 (Latin-1 pages, for
    /// instance) decode to U+FFFD instead of failing the read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self {
            root: kuchiki::parse_html().from_utf8().one(bytes.as_slice()),
        })
    }

    pub fn to_html(&self) -> String {
        self.root.to_string()
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Elements matching a CSS selector list, in document order.
    pub fn select(&self, selectors: &str) -> Vec<NodeRef> {
        match self.root.select(selectors) {
            Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
            Err(()) => {
                tracing::warn!(selectors, "unsupported selector");
                Vec::new()
            }
        }
    }

    /// Every element in document order (`querySelectorAll("*")`).
    pub fn elements(&self) -> Vec<NodeRef> {
        self.root
            .descendants()
            .elements()
            .map(|el| el.as_node().clone())
            .collect()
    }

    pub fn body(&self) -> Option<NodeRef> {
        self.root
            .select_first("body")
            .ok()
            .map(|b| b.as_node().clone())
    }

    /// Computed style from inline declarations along the ancestor chain.
    pub fn computed_style(&self, node: &NodeRef) -> ComputedStyle {
        let mut chain: Vec<NodeRef> = node
            .inclusive_ancestors()
            .filter(|n| n.as_element().is_some())
            .collect();
        chain.reverse();
        chain
            .iter()
            .fold(ComputedStyle::default(), |parent, el| {
                ComputedStyle::cascade(&parent, &attr(el, "style").unwrap_or_default())
            })
    }

    pub fn create_element(&self, tag: &str) -> NodeRef {
        NodeRef::new_element(
            QualName::new(None, Namespace::from(HTML_NS), LocalName::from(tag)),
            std::iter::empty(),
        )
    }

    /// Insert `node` as the first child of `<body>`. Returns false when the
    /// document has no body.
    pub fn prepend_to_body(&self, node: NodeRef) -> bool {
        match self.body() {
            Some(body) => {
                body.prepend(node);
                true
            }
            None => false,
        }
    }

    /// Replace `node` with a `tag` element carrying the same attributes and
    /// the same descendants. Returns the new element.
    pub fn rename_element(&self, node: &NodeRef, tag: &str) -> NodeRef {
        let replacement = self.create_element(tag);
        if let (Some(old), Some(new)) = (node.as_element(), replacement.as_element()) {
            let attrs = old.attributes.borrow();
            let mut new_attrs = new.attributes.borrow_mut();
            for (name, value) in attrs.map.iter() {
                new_attrs.map.insert(name.clone(), value.clone());
            }
        }
        let children: Vec<NodeRef> = node.children().collect();
        for child in children {
            replacement.append(child);
        }
        node.insert_before(replacement.clone());
        node.detach();
        replacement
    }
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element()
        .map(|el| el.name.local.as_ref().to_ascii_lowercase())
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|el| el.attributes.borrow().get(name).map(|s| s.to_string()))
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map(|el| el.attributes.borrow().contains(name))
        .unwrap_or(false)
}

/// Attribute present with a non-blank value.
pub fn has_nonblank_attr(node: &NodeRef, name: &str) -> bool {
    attr(node, name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().remove(name);
    }
}

pub fn trimmed_text(node: &NodeRef) -> String {
    node.text_contents().trim().to_string()
}

/// Replace all children with one text node.
pub fn set_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    let decls = style::parse_declarations(&attr(node, "style")?);
    style::winning(&decls, property).map(|d| d.value.clone())
}

pub fn set_style_property(node: &NodeRef, property: &str, value: &str, important: bool) {
    let mut decls = style::parse_declarations(&attr(node, "style").unwrap_or_default());
    style::set_declaration(&mut decls, property, value, important);
    set_attr(node, "style", &style::serialize_declarations(&decls));
}

/// Drop `property` from the inline style; the attribute goes away when it
/// ends up empty.
pub fn remove_style_property(node: &NodeRef, property: &str) {
    let Some(raw) = attr(node, "style") else {
        return;
    };
    let mut decls = style::parse_declarations(&raw);
    if !style::remove_declaration(&mut decls, property) {
        return;
    }
    if decls.is_empty() {
        remove_attr(node, "style");
    } else {
        set_attr(node, "style", &style::serialize_declarations(&decls));
    }
}

/// Short element description for reports, e.g. `<img src="a.png">`.
pub fn describe(node: &NodeRef) -> String {
    let tag = tag_name(node).unwrap_or_else(|| "#node".to_string());
    let key = ["id", "href", "src", "data", "name", "type"]
        .into_iter()
        .find_map(|k| attr(node, k).map(|v| (k, v)));
    match key {
        Some((k, v)) => {
            let v = if v.chars().count() > 60 {
                format!("{}…", v.chars().take(60).collect::<String>())
            } else {
                v
            };
            format!("<{} {}=\"{}\">", tag, k, v)
        }
        None => format!("<{}>", tag),
    }
}

/// Serialized children, for comparing inner markup.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|c| c.to_string()).collect()
}
