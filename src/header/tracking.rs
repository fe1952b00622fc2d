//! Page analytics events.
//!
//! Classifies raw page events into the site's analytics events and hands
//! them to a `TrackingSink`. Loading the analytics script is the host's job.

use serde::Serialize;

use crate::header::dom::{closest, contains, has_class, query_all, Dom, ElementId};
use crate::header::selector::Selector;

const LINK_TEXT_MAX_CHARS: usize = 80;

const WHATSAPP_MARKERS: [&str; 3] = ["wa.me/", "api.whatsapp.com/", "whatsapp://"];

/// Raw page events the tracker listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Click { target: ElementId },
    Submit { form: ElementId },
    Change { target: ElementId },
}

/// An analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackingEvent {
    WhatsappClick {
        link_url: String,
        link_text: String,
        page_path: String,
    },
    ContactFormSubmit {
        form_id: String,
        form_name: String,
        page_path: String,
    },
    TripBuilderStart {
        trigger: String,
        page_path: String,
    },
    TripBuilderSubmit {
        days: String,
        regions_selected: usize,
        experiences_selected: usize,
        page_path: String,
    },
}

impl TrackingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackingEvent::WhatsappClick { .. } => "whatsapp_click",
            TrackingEvent::ContactFormSubmit { .. } => "contact_form_submit",
            TrackingEvent::TripBuilderStart { .. } => "trip_builder_start",
            TrackingEvent::TripBuilderSubmit { .. } => "trip_builder_submit",
        }
    }
}

/// Destination for analytics events.
pub trait TrackingSink {
    fn track(&mut self, event: TrackingEvent);
}

impl TrackingSink for Vec<TrackingEvent> {
    fn track(&mut self, event: TrackingEvent) {
        self.push(event);
    }
}

#[derive(Debug, Clone, Copy)]
struct TripBuilder {
    days: ElementId,
    regions: ElementId,
    experiences: ElementId,
    generate: ElementId,
}

/// Classifies page events for one page view.
#[derive(Debug, Clone)]
pub struct EventTracker {
    page_path: String,
    trip_builder: Option<TripBuilder>,
    started: bool,
    link: Selector,
    pill: Selector,
    pressed_pill: Selector,
}

impl EventTracker {
    /// Tracker for the page at `page_path`; trip builder events are only
    /// emitted when the trip builder controls exist in `dom`.
    pub fn new<D: Dom>(dom: &D, page_path: &str) -> Self {
        let trip_builder = match (
            dom.element_by_id("daysSelect"),
            dom.element_by_id("regionsPills"),
            dom.element_by_id("experiencesPills"),
            dom.element_by_id("generateBtn"),
        ) {
            (Some(days), Some(regions), Some(experiences), Some(generate)) => Some(TripBuilder {
                days,
                regions,
                experiences,
                generate,
            }),
            _ => None,
        };

        Self {
            page_path: if page_path.is_empty() {
                "/".to_string()
            } else {
                page_path.to_string()
            },
            trip_builder,
            started: false,
            link: Selector::parse("a[href]").unwrap_or_else(|_| Selector::never()),
            pill: Selector::parse(".pill").unwrap_or_else(|_| Selector::never()),
            pressed_pill: Selector::parse(".pill[aria-pressed=true]")
                .unwrap_or_else(|_| Selector::never()),
        }
    }

    pub fn is_trip_builder_page(&self) -> bool {
        self.trip_builder.is_some()
    }

    /// Classify `event` and forward the resulting analytics events.
    pub fn observe<D: Dom, S: TrackingSink>(&mut self, dom: &D, event: PageEvent, sink: &mut S) {
        match event {
            PageEvent::Click { target } => {
                if let Some(event) = self.whatsapp_click(dom, target) {
                    sink.track(event);
                }
                self.trip_builder_click(dom, target, sink);
            }
            PageEvent::Submit { form } => {
                if let Some(event) = self.contact_submit(dom, form) {
                    sink.track(event);
                }
            }
            PageEvent::Change { target } => {
                if self.trip_builder.map_or(false, |tb| tb.days == target) {
                    self.start("days_change", sink);
                }
            }
        }
    }

    fn whatsapp_click<D: Dom>(&self, dom: &D, target: ElementId) -> Option<TrackingEvent> {
        let link = closest(dom, target, &self.link)?;
        let href = dom.attr(link, "href").unwrap_or_default();
        if !WHATSAPP_MARKERS.iter().any(|marker| href.contains(marker)) {
            return None;
        }
        let text: String = dom
            .text_content(link)
            .trim()
            .chars()
            .take(LINK_TEXT_MAX_CHARS)
            .collect();
        Some(TrackingEvent::WhatsappClick {
            link_url: href.to_string(),
            link_text: text,
            page_path: self.page_path.clone(),
        })
    }

    fn contact_submit<D: Dom>(&self, dom: &D, form: ElementId) -> Option<TrackingEvent> {
        if !dom.tag(form).eq_ignore_ascii_case("form") {
            return None;
        }
        let form_id = dom.attr(form, "id").unwrap_or_default();
        let is_contact = dom.attr(form, "data-ga") == Some("contact_form")
            || form_id == "contactForm"
            || has_class(dom, form, "contact-form");
        if !is_contact {
            return None;
        }
        Some(TrackingEvent::ContactFormSubmit {
            form_id: form_id.to_string(),
            form_name: dom.attr(form, "name").unwrap_or_default().to_string(),
            page_path: self.page_path.clone(),
        })
    }

    fn trip_builder_click<D: Dom, S: TrackingSink>(
        &mut self,
        dom: &D,
        target: ElementId,
        sink: &mut S,
    ) {
        let Some(tb) = self.trip_builder else {
            return;
        };

        if let Some(pill) = closest(dom, target, &self.pill) {
            if contains(dom, tb.regions, pill) {
                self.start("region_select", sink);
            }
            if contains(dom, tb.experiences, pill) {
                self.start("experience_select", sink);
            }
        }

        if contains(dom, tb.generate, target) {
            self.start("generate_click", sink);
            if dom.attr(tb.generate, "disabled").is_none() {
                sink.track(TrackingEvent::TripBuilderSubmit {
                    days: dom.attr(tb.days, "value").unwrap_or_default().to_string(),
                    regions_selected: query_all(dom, tb.regions, &self.pressed_pill).len(),
                    experiences_selected: query_all(dom, tb.experiences, &self.pressed_pill)
                        .len(),
                    page_path: self.page_path.clone(),
                });
            }
        }
    }

    fn start<S: TrackingSink>(&mut self, trigger: &str, sink: &mut S) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::debug!(trigger, "Trip builder started");
        sink.track(TrackingEvent::TripBuilderStart {
            trigger: trigger.to_string(),
            page_path: self.page_path.clone(),
        });
    }
}
