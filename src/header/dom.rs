//! The DOM boundary the header controller is written against.
//!
//! # Responsibilities
//! - Define the minimal element operations the controller needs (`Dom`)
//! - Provide tree queries on top of them (`query`, `closest`, `contains`)
//!
//! # Design Decisions
//! - Element handles are plain ids; the host owns the tree
//! - Every lookup is `Option`: a missing element aborts the current step only
//! - Layout access (`rect`, `set_style`) is optional with no-op defaults

use crate::header::selector::Selector;

/// Opaque handle to an element owned by a `Dom` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Viewport-relative bounding box, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// Document scroll lock applied while the mobile menu is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollLock {
    /// Suppress document overflow (`overflow: hidden`, `nav-open` class).
    pub locked: bool,
    /// Also disable touch panning (`touch-action: none`).
    pub touch_action_none: bool,
}

impl ScrollLock {
    pub const RELEASED: ScrollLock = ScrollLock {
        locked: false,
        touch_action_none: false,
    };

    pub fn engaged(lock_touch_action: bool) -> Self {
        Self {
            locked: true,
            touch_action_none: lock_touch_action,
        }
    }
}

/// Host document operations.
pub trait Dom {
    /// Look up an element by its `id` attribute anywhere in the document.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Child elements in document order.
    fn children(&self, el: ElementId) -> Vec<ElementId>;

    /// Lowercase tag name.
    fn tag(&self, el: ElementId) -> &str;

    fn attr(&self, el: ElementId, name: &str) -> Option<&str>;

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str);

    fn remove_attr(&mut self, el: ElementId, name: &str);

    /// Text of the element and its descendants.
    fn text_content(&self, el: ElementId) -> String;

    /// Replace the element's text content.
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Set `<html lang>`.
    fn set_document_lang(&mut self, lang: &str);

    fn set_scroll_lock(&mut self, lock: ScrollLock);

    /// Layout box of an element, when the host can measure it.
    fn rect(&self, _el: ElementId) -> Option<Rect> {
        None
    }

    /// Set (or clear with an empty value) an inline style property.
    fn set_style(&mut self, _el: ElementId, _property: &str, _value: &str) {}
}

/// Whether the element's `class` attribute contains `class`.
pub fn has_class<D: Dom + ?Sized>(dom: &D, el: ElementId, class: &str) -> bool {
    dom.attr(el, "class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Add or remove a class.
pub fn toggle_class<D: Dom + ?Sized>(dom: &mut D, el: ElementId, class: &str, on: bool) {
    let current = dom.attr(el, "class").unwrap_or_default().to_string();
    let mut classes: Vec<&str> = current
        .split_ascii_whitespace()
        .filter(|c| *c != class)
        .collect();
    if on {
        classes.push(class);
    }
    dom.set_attr(el, "class", &classes.join(" "));
}

/// Set or clear the `hidden` attribute.
pub fn set_hidden<D: Dom + ?Sized>(dom: &mut D, el: ElementId, hidden: bool) {
    if hidden {
        dom.set_attr(el, "hidden", "");
    } else {
        dom.remove_attr(el, "hidden");
    }
}

pub fn is_hidden<D: Dom + ?Sized>(dom: &D, el: ElementId) -> bool {
    dom.attr(el, "hidden").is_some()
}

/// First descendant of `root` (excluding `root`) matching the selector.
pub fn query<D: Dom + ?Sized>(dom: &D, root: ElementId, selector: &Selector) -> Option<ElementId> {
    let mut stack: Vec<ElementId> = dom.children(root).into_iter().rev().collect();
    while let Some(el) = stack.pop() {
        if selector.matches(dom, el) {
            return Some(el);
        }
        stack.extend(dom.children(el).into_iter().rev());
    }
    None
}

/// All descendants of `root` matching the selector, in document order.
pub fn query_all<D: Dom + ?Sized>(dom: &D, root: ElementId, selector: &Selector) -> Vec<ElementId> {
    let mut found = Vec::new();
    let mut stack: Vec<ElementId> = dom.children(root).into_iter().rev().collect();
    while let Some(el) = stack.pop() {
        if selector.matches(dom, el) {
            found.push(el);
        }
        stack.extend(dom.children(el).into_iter().rev());
    }
    found
}

/// Nearest inclusive ancestor of `el` matching the selector.
pub fn closest<D: Dom + ?Sized>(dom: &D, el: ElementId, selector: &Selector) -> Option<ElementId> {
    let mut current = Some(el);
    while let Some(node) = current {
        if selector.matches(dom, node) {
            return Some(node);
        }
        current = dom.parent(node);
    }
    None
}

/// Whether `node` is `ancestor` or one of its descendants.
pub fn contains<D: Dom + ?Sized>(dom: &D, ancestor: ElementId, node: ElementId) -> bool {
    let mut current = Some(node);
    while let Some(el) = current {
        if el == ancestor {
            return true;
        }
        current = dom.parent(el);
    }
    false
}
