//! Language switch and header link localization.
//!
//! Runs once per binding: points every switch control at the translated
//! current page, rewrites internal header links to the current locale and
//! swaps dual-language labels.

use crate::header::config::{HeaderConfig, Selectors};
use crate::header::dom::{contains, has_class, query, query_all, Dom, ElementId};
use crate::i18n::{is_rewritable_link, normalize_path, translate_path, Locale};

/// Result of localizing a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageState {
    /// Locale of the current page.
    pub locale: Locale,
    /// Href given to every language switch control.
    pub switch_href: String,
    /// Switch controls found in the header.
    pub switches: Vec<ElementId>,
    /// Number of links rewritten to the current locale.
    pub rewritten: usize,
}

/// Localize the header rooted at `root`.
///
/// `scope` bounds the opt-in rewrite: links marked with the force-rewrite
/// attribute are rewritten anywhere inside it, even outside `root`.
pub(crate) fn apply_language<D: Dom>(
    dom: &mut D,
    root: ElementId,
    scope: ElementId,
    selectors: &Selectors,
    config: &HeaderConfig,
    current_path: &str,
) -> LanguageState {
    let current = normalize_path(current_path);
    let locale = Locale::of_path(&current);
    let switch_href = translate_path(&current, locale.opposite());

    let switches = query_all(dom, root, &selectors.lang_switch);
    for &switch in &switches {
        dom.set_attr(switch, "href", &switch_href);
        let label = match (locale, has_class(dom, switch, "nav-link")) {
            (Locale::Es, true) => "EN",
            (Locale::En, true) => "ES",
            (Locale::Es, false) => "English",
            (Locale::En, false) => "Espanol",
        };
        dom.set_text(switch, label);
    }

    let mut rewritten = 0;
    for link in query_all(dom, scope, &selectors.link) {
        let in_header = contains(dom, root, link);
        let forced = dom.attr(link, &config.force_rewrite_attribute).is_some();
        if !in_header && !forced {
            continue;
        }
        if dom.attr(link, &config.lang_switch_attribute).is_some()
            || dom.attr(link, &config.no_rewrite_attribute).is_some()
        {
            continue;
        }
        let Some(href) = dom.attr(link, "href").map(str::to_string) else {
            continue;
        };
        if !is_rewritable_link(&href) {
            continue;
        }
        let localized = translate_path(&href, locale);
        if localized != href {
            dom.set_attr(link, "href", &localized);
            rewritten += 1;
        }
    }

    dom.set_document_lang(locale.as_str());
    apply_labels(dom, root, selectors, config, locale);

    LanguageState {
        locale,
        switch_href,
        switches,
        rewritten,
    }
}

fn apply_labels<D: Dom>(
    dom: &mut D,
    root: ElementId,
    selectors: &Selectors,
    config: &HeaderConfig,
    locale: Locale,
) {
    let text_attribute = match locale {
        Locale::En => &config.en_attribute,
        Locale::Es => &config.es_attribute,
    };
    for label in query_all(dom, root, &selectors.i18n_label) {
        let text = dom.attr(label, text_attribute).unwrap_or_default().to_string();
        if !text.is_empty() {
            dom.set_text(label, &text);
        }
    }

    let aria_attribute = match locale {
        Locale::En => &config.en_aria_attribute,
        Locale::Es => &config.es_aria_attribute,
    };
    if let Some(button) = query(dom, root, &selectors.toggle_button) {
        let aria = dom
            .attr(button, aria_attribute)
            .filter(|v| !v.is_empty())
            .unwrap_or("Menu")
            .to_string();
        dom.set_attr(button, "aria-label", &aria);
    }
}
