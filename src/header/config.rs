//! DOM contract of the injected header include.
//!
//! Every selector and attribute the controller depends on lives here, so one
//! controller serves all header revisions. Defaults match the current
//! `/assets/includes/header.html`.

use serde::{Deserialize, Serialize};

use crate::header::selector::{Selector, SelectorError};

/// Header controller configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HeaderConfig {
    /// Id of the element the header include is injected into.
    pub mount_id: String,

    /// Candidates for the header root inside the mount, tried in order.
    pub header_selectors: Vec<String>,

    /// Hamburger toggle control.
    pub toggle_selector: String,

    /// Mobile navigation container.
    pub mobile_nav_selector: String,

    /// Main drill-down panel inside the mobile nav.
    pub main_panel_selector: String,

    /// Named drill-down panels inside the mobile nav.
    pub submenu_selector: String,

    /// Submenu trigger inside the mobile nav.
    pub submenu_trigger_selector: String,

    /// Attribute on a trigger holding the selector of its submenu panel.
    pub target_attribute: String,

    /// Attribute marking "back to main" controls.
    pub back_attribute: String,

    /// Desktop dropdown containers.
    pub dropdown_selector: String,
    pub dropdown_trigger_selector: String,
    pub dropdown_menu_selector: String,

    /// Language switch controls.
    pub lang_switch_attribute: String,

    /// Links carrying this attribute are never rewritten.
    pub no_rewrite_attribute: String,

    /// Links carrying this attribute are rewritten even outside the header root.
    pub force_rewrite_attribute: String,

    /// Dual-language text labels (`data-en` / `data-es`).
    pub i18n_label_class: String,
    pub en_attribute: String,
    pub es_attribute: String,

    /// Toggle button carrying `data-en-aria` / `data-es-aria`.
    pub toggle_button_selector: String,
    pub en_aria_attribute: String,
    pub es_aria_attribute: String,

    /// Resizing to at least this width collapses the mobile menu.
    pub desktop_breakpoint_px: u32,

    /// Dropdown menus are clamped into the viewport at or below this width.
    pub dropdown_mobile_max_px: u32,

    /// Dropdowns only react at or above this width (0 = always).
    pub dropdown_min_width_px: u32,

    /// Outside clicks close the menu only at or below this width (None = always).
    pub outside_click_max_width_px: Option<u32>,

    /// Also set `touch-action: none` while the menu is open.
    pub lock_touch_action: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            mount_id: "siteHeader".to_string(),
            header_selectors: vec![
                ".topbar".to_string(),
                "header".to_string(),
                "[data-header]".to_string(),
            ],
            toggle_selector: "#eeNavToggle".to_string(),
            mobile_nav_selector: ".nav-mobile".to_string(),
            main_panel_selector: ".m-main".to_string(),
            submenu_selector: ".m-submenu".to_string(),
            submenu_trigger_selector: ".m-next".to_string(),
            target_attribute: "data-target".to_string(),
            back_attribute: "data-back".to_string(),
            dropdown_selector: "[data-dd]".to_string(),
            dropdown_trigger_selector: ".dropbtn".to_string(),
            dropdown_menu_selector: ".dropdown-menu".to_string(),
            lang_switch_attribute: "data-lang-switch".to_string(),
            no_rewrite_attribute: "data-no-rewrite".to_string(),
            force_rewrite_attribute: "data-rewrite".to_string(),
            i18n_label_class: "i18n".to_string(),
            en_attribute: "data-en".to_string(),
            es_attribute: "data-es".to_string(),
            toggle_button_selector: ".nav-toggle-btn".to_string(),
            en_aria_attribute: "data-en-aria".to_string(),
            es_aria_attribute: "data-es-aria".to_string(),
            desktop_breakpoint_px: 901,
            dropdown_mobile_max_px: 620,
            dropdown_min_width_px: 0,
            outside_click_max_width_px: None,
            lock_touch_action: true,
        }
    }
}

/// Parsed selectors, built once per binding.
#[derive(Debug, Clone)]
pub(crate) struct Selectors {
    pub header_roots: Vec<Selector>,
    pub toggle: Selector,
    pub mobile_nav: Selector,
    pub main_panel: Selector,
    pub submenu: Selector,
    pub submenu_trigger: Selector,
    pub back: Selector,
    pub dropdown: Selector,
    pub dropdown_trigger: Selector,
    pub dropdown_menu: Selector,
    pub lang_switch: Selector,
    pub link: Selector,
    pub i18n_label: Selector,
    pub toggle_button: Selector,
}

impl HeaderConfig {
    /// Parse every selector in the contract, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<(String, SelectorError)>> {
        self.selectors().map(|_| ())
    }

    pub(crate) fn selectors(&self) -> Result<Selectors, Vec<(String, SelectorError)>> {
        let mut errors = Vec::new();
        let mut parse = |field: &str, source: String| {
            Selector::parse(&source).unwrap_or_else(|e| {
                errors.push((field.to_string(), e));
                Selector::never()
            })
        };

        let selectors = Selectors {
            header_roots: self
                .header_selectors
                .iter()
                .map(|s| parse("header_selectors", s.clone()))
                .collect(),
            toggle: parse("toggle_selector", self.toggle_selector.clone()),
            mobile_nav: parse("mobile_nav_selector", self.mobile_nav_selector.clone()),
            main_panel: parse("main_panel_selector", self.main_panel_selector.clone()),
            submenu: parse("submenu_selector", self.submenu_selector.clone()),
            submenu_trigger: parse(
                "submenu_trigger_selector",
                self.submenu_trigger_selector.clone(),
            ),
            back: parse("back_attribute", format!("[{}]", self.back_attribute)),
            dropdown: parse("dropdown_selector", self.dropdown_selector.clone()),
            dropdown_trigger: parse(
                "dropdown_trigger_selector",
                self.dropdown_trigger_selector.clone(),
            ),
            dropdown_menu: parse("dropdown_menu_selector", self.dropdown_menu_selector.clone()),
            lang_switch: parse(
                "lang_switch_attribute",
                format!("[{}]", self.lang_switch_attribute),
            ),
            link: parse("link", "a[href]".to_string()),
            i18n_label: parse(
                "i18n_label_class",
                format!(
                    ".{}[{}][{}]",
                    self.i18n_label_class, self.en_attribute, self.es_attribute
                ),
            ),
            toggle_button: parse(
                "toggle_button_selector",
                format!(
                    "{}[{}][{}]",
                    self.toggle_button_selector, self.en_aria_attribute, self.es_aria_attribute
                ),
            ),
        };

        if self.header_selectors.is_empty() {
            errors.push(("header_selectors".to_string(), SelectorError::Empty));
        }
        if errors.is_empty() {
            Ok(selectors)
        } else {
            Err(errors)
        }
    }
}
