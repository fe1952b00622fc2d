//! Header/navigation controller.
//!
//! # Responsibilities
//! - Drive the mobile menu state machine from UI events
//! - Render the state: toggle `aria-expanded`, visible panel, scroll lock
//! - Route dropdown clicks to the desktop `DropdownSet`
//! - Hand language-switch clicks back to the host as navigations
//!
//! # Design Decisions
//! - The controller never holds the DOM; every call borrows it
//! - Missing markup degrades to "no interactivity", never an error
//! - Breakpoints and touch locking come from `HeaderConfig`

use crate::header::config::{HeaderConfig, Selectors};
use crate::header::dom::{
    closest, contains, query, query_all, set_hidden, toggle_class, Dom, ElementId, ScrollLock,
};
use crate::header::dropdown::DropdownSet;
use crate::header::language::{apply_language, LanguageState};
use crate::header::selector::Selector;
use crate::header::state::{MenuState, Panel};
use crate::header::HeaderError;
use crate::i18n::Locale;

/// UI events forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A click whose innermost target is `target`.
    Click { target: ElementId },
    KeyDown { key: String },
    /// Viewport resized to `width` CSS pixels.
    Resize { width: u32 },
}

impl UiEvent {
    pub fn click(target: ElementId) -> Self {
        UiEvent::Click { target }
    }

    pub fn key(key: &str) -> Self {
        UiEvent::KeyDown {
            key: key.to_string(),
        }
    }

    pub fn resize(width: u32) -> Self {
        UiEvent::Resize { width }
    }
}

/// What the host should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event changed header state; suppress the default action.
    Handled,
    /// Not ours; let the default action run.
    Ignored,
    /// Navigate to the given href (language switch).
    Navigate(String),
}

/// Toggle control and mobile nav of a header with a mobile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileMenu {
    pub toggle: ElementId,
    pub nav: ElementId,
}

/// Controller bound to one concrete header element.
#[derive(Debug, Clone)]
pub struct HeaderController {
    config: HeaderConfig,
    selectors: Selectors,
    root: ElementId,
    mobile: Option<MobileMenu>,
    state: MenuState,
    dropdowns: DropdownSet,
    language: LanguageState,
    viewport_width: u32,
}

impl HeaderController {
    /// Bind to the header rooted at `root` inside `mount`.
    ///
    /// Localizes the header immediately. A header without a toggle or mobile
    /// nav still binds, with an inert mobile menu.
    pub fn bind<D: Dom>(
        dom: &mut D,
        mount: ElementId,
        root: ElementId,
        config: &HeaderConfig,
        current_path: &str,
        viewport_width: u32,
    ) -> Result<Self, HeaderError> {
        let selectors = config.selectors().map_err(HeaderError::InvalidContract)?;

        let language = apply_language(dom, root, mount, &selectors, config, current_path);

        let containers = query_all(dom, root, &selectors.dropdown);
        let dropdowns = DropdownSet::discover(
            dom,
            containers,
            &selectors.dropdown_trigger,
            &selectors.dropdown_menu,
        );

        let mobile = match (
            query(dom, root, &selectors.toggle),
            query(dom, root, &selectors.mobile_nav),
        ) {
            (Some(toggle), Some(nav)) => Some(MobileMenu { toggle, nav }),
            _ => None,
        };

        let controller = Self {
            config: config.clone(),
            selectors,
            root,
            mobile,
            state: MenuState::Collapsed,
            dropdowns,
            language,
            viewport_width,
        };

        if let Some(menu) = controller.mobile {
            if dom.attr(menu.toggle, "aria-expanded").is_none() {
                dom.set_attr(menu.toggle, "aria-expanded", "false");
            }
            controller.render_panels(dom, menu);
        }

        tracing::debug!(
            root = ?root,
            locale = %controller.language.locale,
            mobile_menu = controller.mobile.is_some(),
            dropdowns = controller.dropdowns.len(),
            rewritten = controller.language.rewritten,
            "Header bound"
        );

        Ok(controller)
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.language.locale
    }

    pub fn language(&self) -> &LanguageState {
        &self.language
    }

    pub fn dropdowns(&self) -> &DropdownSet {
        &self.dropdowns
    }

    pub fn mobile_menu(&self) -> Option<MobileMenu> {
        self.mobile
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Handle one UI event.
    pub fn handle<D: Dom>(&mut self, dom: &mut D, event: &UiEvent) -> Outcome {
        match event {
            UiEvent::Click { target } => self.on_click(dom, *target),
            UiEvent::KeyDown { key } if key == "Escape" => {
                let closed_dropdowns = self.dropdowns.close_all(dom);
                let collapsed = self.collapse(dom);
                handled(closed_dropdowns || collapsed)
            }
            UiEvent::KeyDown { .. } => Outcome::Ignored,
            UiEvent::Resize { width } => self.on_resize(dom, *width),
        }
    }

    /// Open or close the mobile menu.
    pub fn toggle<D: Dom>(&mut self, dom: &mut D) -> bool {
        self.transition(dom, self.state.toggle())
    }

    /// Force the menu closed and back on the main panel.
    pub fn collapse<D: Dom>(&mut self, dom: &mut D) -> bool {
        self.transition(dom, self.state.collapse())
    }

    fn on_click<D: Dom>(&mut self, dom: &mut D, target: ElementId) -> Outcome {
        let mut changed = false;

        if self.dropdowns_enabled() {
            if let Some(index) = closest(dom, target, &self.selectors.dropdown_trigger)
                .and_then(|trigger| self.dropdowns.index_of_trigger(trigger))
            {
                self.dropdowns.toggle(dom, index);
                self.dropdowns
                    .clamp_open(dom, self.viewport_width, self.config.dropdown_mobile_max_px);
                return Outcome::Handled;
            }
            if self.inside_open_dropdown_menu(dom, target) {
                return Outcome::Handled;
            }
            changed |= self.dropdowns.close_all(dom);
        }

        if let Some(switch) = closest(dom, target, &self.selectors.lang_switch) {
            if contains(dom, self.root, switch) {
                let href = dom.attr(switch, "href").unwrap_or_default().to_string();
                if !href.is_empty() && href != "#" {
                    self.collapse(dom);
                    tracing::debug!(href = %href, "Language switch");
                    return Outcome::Navigate(href);
                }
            }
        }

        let Some(menu) = self.mobile else {
            return handled(changed);
        };

        if contains(dom, menu.toggle, target) {
            self.toggle(dom);
            return Outcome::Handled;
        }

        if !self.state.is_expanded() {
            return handled(changed);
        }

        if contains(dom, menu.nav, target) {
            if let Some(trigger) = closest(dom, target, &self.selectors.submenu_trigger) {
                let panel = dom
                    .attr(trigger, &self.config.target_attribute)
                    .unwrap_or_default()
                    .to_string();
                if !panel.is_empty() && self.find_panel(dom, menu, &panel).is_some() {
                    let next = self.state.open_submenu(&panel);
                    self.transition(dom, next);
                    return Outcome::Handled;
                }
            }
            if closest(dom, target, &self.selectors.back).is_some() {
                let next = self.state.back();
                self.transition(dom, next);
                return Outcome::Handled;
            }
            if let Some(link) = closest(dom, target, &self.selectors.link) {
                let href = dom.attr(link, "href").unwrap_or_default();
                if !href.is_empty() && !href.starts_with('#') {
                    // Real navigation: close, but let the browser follow the link.
                    self.collapse(dom);
                    return Outcome::Ignored;
                }
            }
            return handled(changed);
        }

        if !contains(dom, self.root, target) && self.outside_click_enabled() {
            self.collapse(dom);
            return Outcome::Handled;
        }

        handled(changed)
    }

    fn on_resize<D: Dom>(&mut self, dom: &mut D, width: u32) -> Outcome {
        self.viewport_width = width;
        let mut changed = false;

        if self.dropdowns.open_index().is_some() {
            if width <= self.config.dropdown_mobile_max_px {
                self.dropdowns
                    .clamp_open(dom, width, self.config.dropdown_mobile_max_px);
            } else {
                changed |= self.dropdowns.close_all(dom);
            }
        }

        if width >= self.config.desktop_breakpoint_px {
            changed |= self.collapse(dom);
        }

        handled(changed)
    }

    fn dropdowns_enabled(&self) -> bool {
        !self.dropdowns.is_empty() && self.viewport_width >= self.config.dropdown_min_width_px
    }

    fn outside_click_enabled(&self) -> bool {
        self.config
            .outside_click_max_width_px
            .map_or(true, |max| self.viewport_width <= max)
    }

    fn inside_open_dropdown_menu<D: Dom>(&self, dom: &D, target: ElementId) -> bool {
        self.dropdowns
            .open_index()
            .and_then(|i| self.dropdowns.get(i))
            .and_then(|dd| dd.menu)
            .map_or(false, |menu| contains(dom, menu, target))
    }

    fn find_panel<D: Dom>(&self, dom: &D, menu: MobileMenu, panel: &str) -> Option<ElementId> {
        let selector = Selector::parse(panel).ok()?;
        query(dom, menu.nav, &selector)
    }

    /// Move to `next` and render it. An inert menu never leaves `Collapsed`.
    fn transition<D: Dom>(&mut self, dom: &mut D, next: MenuState) -> bool {
        let Some(menu) = self.mobile else {
            return false;
        };
        if next == self.state {
            return false;
        }
        tracing::debug!(from = ?self.state, to = ?next, "Menu transition");
        self.state = next;
        self.render(dom, menu);
        true
    }

    fn render<D: Dom>(&self, dom: &mut D, menu: MobileMenu) {
        let expanded = self.state.is_expanded();
        dom.set_attr(
            menu.toggle,
            "aria-expanded",
            if expanded { "true" } else { "false" },
        );
        if expanded {
            dom.set_attr(menu.toggle, "checked", "");
        } else {
            dom.remove_attr(menu.toggle, "checked");
        }
        toggle_class(dom, menu.nav, "is-open", expanded);
        self.render_panels(dom, menu);
        dom.set_scroll_lock(if expanded {
            ScrollLock::engaged(self.config.lock_touch_action)
        } else {
            ScrollLock::RELEASED
        });
    }

    fn render_panels<D: Dom>(&self, dom: &mut D, menu: MobileMenu) {
        let main = query(dom, menu.nav, &self.selectors.main_panel);
        let submenus = query_all(dom, menu.nav, &self.selectors.submenu);

        let target = match self.state.panel() {
            Panel::Main => None,
            Panel::Submenu(name) => self.find_panel(dom, menu, name),
        };

        for sub in submenus {
            set_hidden(dom, sub, Some(sub) != target);
        }
        if let Some(main) = main {
            set_hidden(dom, main, target.is_some());
        }
        if let Some(target) = target {
            set_hidden(dom, target, false);
        }
    }
}

fn handled(changed: bool) -> Outcome {
    if changed {
        Outcome::Handled
    } else {
        Outcome::Ignored
    }
}
