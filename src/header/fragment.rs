//! In-memory document implementing `Dom`.
//!
//! Drives the header controller outside a browser, where the host document
//! is modelled as an arena of elements.

use crate::header::dom::{Dom, ElementId, Rect, ScrollLock};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    styles: Vec<(String, String)>,
    rect: Option<Rect>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Declarative description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    rect: Option<Rect>,
}

impl ElementSpec {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn rect(mut self, left: f64, right: f64) -> Self {
        self.rect = Some(Rect::new(left, right));
        self
    }
}

/// Arena-backed document with `<html>` and `<body>` roots.
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Node>,
    scroll_lock: ScrollLock,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragment {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                tag: "html".to_string(),
                ..Node::default()
            }],
            scroll_lock: ScrollLock::RELEASED,
        };
        let html = doc.html();
        doc.append(html, Self::element("body"));
        doc
    }

    /// Start describing an element.
    pub fn element(tag: &str) -> ElementSpec {
        ElementSpec {
            tag: tag.to_ascii_lowercase(),
            ..ElementSpec::default()
        }
    }

    pub fn html(&self) -> ElementId {
        ElementId(0)
    }

    pub fn body(&self) -> ElementId {
        ElementId(1)
    }

    /// Append a new element as the last child of `parent`.
    ///
    /// An unknown `parent` leaves the new element detached.
    pub fn append(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.nodes.len());
        let parent = match self.nodes.get_mut(parent.0) {
            Some(node) => {
                node.children.push(id);
                Some(parent)
            }
            None => None,
        };
        self.nodes.push(Node {
            tag: spec.tag,
            attrs: spec.attrs,
            text: spec.text,
            styles: Vec::new(),
            rect: spec.rect,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Detach all children of `el`; detached nodes stay in the arena.
    pub fn clear_children(&mut self, el: ElementId) {
        let Some(node) = self.nodes.get_mut(el.0) else {
            return;
        };
        for child in std::mem::take(&mut node.children) {
            if let Some(child) = self.nodes.get_mut(child.0) {
                child.parent = None;
            }
        }
    }

    /// Own text of `el`, excluding descendants.
    pub fn text(&self, el: ElementId) -> &str {
        self.node(el).map_or("", |n| n.text.as_str())
    }

    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.node(el)?
            .styles
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock
    }

    pub fn document_lang(&self) -> Option<&str> {
        self.attr(self.html(), "lang")
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0)
    }

    fn is_attached(&self, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == self.html() {
                return true;
            }
            current = self.node(node).and_then(|n| n.parent);
        }
        false
    }
}

impl Dom for Fragment {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        (0..self.nodes.len()).map(ElementId).find(|&el| {
            self.attr(el, "id") == Some(id) && self.is_attached(el)
        })
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.node(el).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn tag(&self, el: ElementId) -> &str {
        self.node(el).map(|n| n.tag.as_str()).unwrap_or("")
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.node(el)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(el.0) else {
            return;
        };
        match node.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&mut self, el: ElementId, name: &str) {
        if let Some(node) = self.nodes.get_mut(el.0) {
            node.attrs.retain(|(k, _)| k != name);
        }
    }

    fn text_content(&self, el: ElementId) -> String {
        let Some(node) = self.node(el) else {
            return String::new();
        };
        let mut text = node.text.clone();
        for &child in &node.children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.clear_children(el);
        if let Some(node) = self.nodes.get_mut(el.0) {
            node.text = text.to_string();
        }
    }

    fn set_document_lang(&mut self, lang: &str) {
        let html = self.html();
        self.set_attr(html, "lang", lang);
    }

    fn set_scroll_lock(&mut self, lock: ScrollLock) {
        self.scroll_lock = lock;
        let html = self.html();
        crate::header::dom::toggle_class(self, html, "nav-open", lock.locked);
        let body = self.body();
        self.set_style(body, "overflow", if lock.locked { "hidden" } else { "" });
        self.set_style(
            body,
            "touch-action",
            if lock.touch_action_none { "none" } else { "" },
        );
    }

    fn rect(&self, el: ElementId) -> Option<Rect> {
        self.node(el).and_then(|n| n.rect)
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(el.0) else {
            return;
        };
        node.styles.retain(|(k, _)| k != property);
        if !value.is_empty() {
            node.styles.push((property.to_string(), value.to_string()));
        }
    }
}
