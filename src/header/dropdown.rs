//! Desktop dropdown menus.
//!
//! # Responsibilities
//! - Keep at most one dropdown open at a time
//! - Reflect the open state as the `open` class and `aria-expanded`
//! - Nudge an open menu back inside the viewport on narrow screens
//!
//! # Design Decisions
//! - Dropdowns are independent of the mobile menu state machine
//! - Opening one dropdown closes every other one
//! - Outside click, Escape and resize close all

use crate::header::dom::{query, toggle_class, Dom, ElementId, Rect};
use crate::header::selector::Selector;

/// Padding kept between a clamped menu and the viewport edge, in px.
pub const VIEWPORT_PAD_PX: f64 = 12.0;

/// One `[data-dd]` container with its trigger and menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dropdown {
    pub container: ElementId,
    pub trigger: ElementId,
    pub menu: Option<ElementId>,
}

/// The set of dropdowns found in a header.
#[derive(Debug, Clone, Default)]
pub struct DropdownSet {
    items: Vec<Dropdown>,
    open: Option<usize>,
}

impl DropdownSet {
    /// Collect dropdown containers; containers without a trigger are skipped.
    pub fn discover<D: Dom>(
        dom: &D,
        containers: Vec<ElementId>,
        trigger: &Selector,
        menu: &Selector,
    ) -> Self {
        let items = containers
            .into_iter()
            .filter_map(|container| {
                let trigger = query(dom, container, trigger)?;
                Some(Dropdown {
                    container,
                    trigger,
                    menu: query(dom, container, menu),
                })
            })
            .collect();
        Self { items, open: None }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn get(&self, index: usize) -> Option<&Dropdown> {
        self.items.get(index)
    }

    /// Index of the dropdown whose trigger is `el`.
    pub fn index_of_trigger(&self, el: ElementId) -> Option<usize> {
        self.items.iter().position(|d| d.trigger == el)
    }

    /// Open `index` and close the others, or close it when already open.
    pub fn toggle<D: Dom>(&mut self, dom: &mut D, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let was_open = self.open == Some(index);
        self.close_all(dom);
        if !was_open {
            self.open = Some(index);
            self.render(dom, index, true);
        }
        true
    }

    /// Close every dropdown. Returns whether one was open.
    pub fn close_all<D: Dom>(&mut self, dom: &mut D) -> bool {
        for index in 0..self.items.len() {
            self.render(dom, index, false);
        }
        self.open.take().is_some()
    }

    fn render<D: Dom>(&self, dom: &mut D, index: usize, open: bool) {
        let item = self.items[index];
        toggle_class(dom, item.container, "open", open);
        dom.set_attr(
            item.trigger,
            "aria-expanded",
            if open { "true" } else { "false" },
        );
    }

    /// Re-position the open menu for the current viewport.
    pub fn clamp_open<D: Dom>(&self, dom: &mut D, viewport_width: u32, mobile_max_px: u32) {
        let Some(menu) = self.open.and_then(|i| self.items[i].menu) else {
            return;
        };
        let Some(rect) = dom.rect(menu) else {
            return;
        };
        let mobile = viewport_width <= mobile_max_px;
        let offset = clamp_offset(rect, f64::from(viewport_width), VIEWPORT_PAD_PX, mobile);
        dom.set_style(menu, "left", "50%");
        dom.set_style(menu, "right", "auto");
        dom.set_style(menu, "transform", "translateX(-50%)");
        dom.set_style(menu, "margin-left", &format!("{offset}px"));
    }
}

/// Horizontal nudge (px) that keeps a centred menu inside the viewport.
///
/// `rect` is the menu box after centring under its trigger. Only narrow
/// (mobile) viewports are clamped; elsewhere the offset is zero.
pub fn clamp_offset(rect: Rect, viewport_width: f64, pad: f64, mobile: bool) -> f64 {
    if !mobile {
        return 0.0;
    }
    if rect.left < pad {
        pad - rect.left
    } else if rect.right > viewport_width - pad {
        (viewport_width - pad) - rect.right
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::dom::has_class;
    use crate::header::fragment::Fragment;

    fn build() -> (Fragment, DropdownSet) {
        let mut doc = Fragment::new();
        let body = doc.body();
        let mut containers = Vec::new();
        for name in ["regions", "experiences"] {
            let dd = doc.append(body, Fragment::element("div").attr("data-dd", name));
            doc.append(dd, Fragment::element("button").attr("class", "dropbtn"));
            doc.append(
                dd,
                Fragment::element("div")
                    .attr("class", "dropdown-menu")
                    .rect(-40.0, 160.0),
            );
            containers.push(dd);
        }
        // No trigger: skipped.
        containers.push(doc.append(body, Fragment::element("div").attr("data-dd", "")));

        let set = DropdownSet::discover(
            &doc,
            containers,
            &Selector::parse(".dropbtn").unwrap(),
            &Selector::parse(".dropdown-menu").unwrap(),
        );
        (doc, set)
    }

    #[test]
    fn test_only_one_open() {
        let (mut doc, mut set) = build();
        assert_eq!(set.len(), 2);

        assert!(set.toggle(&mut doc, 0));
        assert_eq!(set.open_index(), Some(0));
        assert!(has_class(&doc, set.get(0).unwrap().container, "open"));

        set.toggle(&mut doc, 1);
        assert_eq!(set.open_index(), Some(1));
        assert!(!has_class(&doc, set.get(0).unwrap().container, "open"));
        assert_eq!(doc.attr(set.get(0).unwrap().trigger, "aria-expanded"), Some("false"));
        assert_eq!(doc.attr(set.get(1).unwrap().trigger, "aria-expanded"), Some("true"));

        set.toggle(&mut doc, 1);
        assert_eq!(set.open_index(), None);
        assert!(!set.toggle(&mut doc, 7));
    }

    #[test]
    fn test_close_all() {
        let (mut doc, mut set) = build();
        set.toggle(&mut doc, 0);
        assert!(set.close_all(&mut doc));
        assert!(!set.close_all(&mut doc));
        assert!(!has_class(&doc, set.get(0).unwrap().container, "open"));
    }

    #[test]
    fn test_clamp_offset() {
        let inside = Rect::new(20.0, 200.0);
        assert_eq!(clamp_offset(inside, 375.0, 12.0, true), 0.0);
        assert_eq!(clamp_offset(Rect::new(-40.0, 160.0), 375.0, 12.0, true), 52.0);
        assert_eq!(clamp_offset(Rect::new(250.0, 400.0), 375.0, 12.0, true), -37.0);
        assert_eq!(clamp_offset(Rect::new(-40.0, 160.0), 1280.0, 12.0, false), 0.0);
    }

    #[test]
    fn test_clamp_open_menu_sets_margin() {
        let (mut doc, mut set) = build();
        set.toggle(&mut doc, 0);
        set.clamp_open(&mut doc, 375, 620);
        let menu = set.get(0).unwrap().menu.unwrap();
        assert_eq!(doc.style(menu, "margin-left"), Some("52px"));
        assert_eq!(doc.style(menu, "left"), Some("50%"));
    }
}
