//! Header initialization.
//!
//! The header markup is injected asynchronously into the mount element, so
//! binding is driven by mount events rather than page load. A registry keyed
//! by element identity guarantees one binding per concrete header element.

use std::collections::HashSet;

use crate::header::config::HeaderConfig;
use crate::header::controller::{HeaderController, Outcome, UiEvent};
use crate::header::dom::{query, Dom, ElementId};
use crate::header::HeaderError;

/// Signals that the header may have become available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountEvent {
    /// The include loader finished injecting the header.
    HeaderMounted,
    /// A child was inserted under the mount (observer compatibility).
    ChildInserted,
    /// Page load fallback.
    WindowLoad,
}

/// Result of processing a mount event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStatus {
    /// A new header element was bound.
    Bound(ElementId),
    /// The header element was already bound.
    AlreadyBound(ElementId),
    /// No header markup yet.
    Pending,
    /// Observation stopped; the event was ignored.
    Disconnected,
}

/// Binds the header controller when the header markup appears.
#[derive(Debug)]
pub struct HeaderBootstrap {
    config: HeaderConfig,
    current_path: String,
    viewport_width: u32,
    bound: HashSet<ElementId>,
    observing: bool,
    controller: Option<HeaderController>,
}

impl HeaderBootstrap {
    /// Create a bootstrap; fails fast on an invalid selector contract.
    pub fn new(
        config: HeaderConfig,
        current_path: &str,
        viewport_width: u32,
    ) -> Result<Self, HeaderError> {
        config.validate().map_err(HeaderError::InvalidContract)?;
        Ok(Self {
            config,
            current_path: current_path.to_string(),
            viewport_width,
            bound: HashSet::new(),
            observing: true,
            controller: None,
        })
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn controller(&self) -> Option<&HeaderController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut HeaderController> {
        self.controller.as_mut()
    }

    /// Whether `el` has been bound.
    pub fn is_bound(&self, el: ElementId) -> bool {
        self.bound.contains(&el)
    }

    /// Try to bind the header in response to `event`.
    pub fn on_event<D: Dom>(&mut self, dom: &mut D, event: MountEvent) -> BootStatus {
        if event == MountEvent::ChildInserted && !self.observing {
            return BootStatus::Disconnected;
        }

        let Some((mount, root)) = self.locate(dom) else {
            tracing::trace!(?event, "Header not mounted yet");
            return BootStatus::Pending;
        };
        if self.bound.contains(&root) {
            return BootStatus::AlreadyBound(root);
        }

        let width = self
            .controller
            .as_ref()
            .map_or(self.viewport_width, HeaderController::viewport_width);
        match HeaderController::bind(dom, mount, root, &self.config, &self.current_path, width) {
            Ok(controller) => {
                self.bound.insert(root);
                self.observing = false;
                self.controller = Some(controller);
                tracing::debug!(?event, root = ?root, "Header bootstrap bound");
                BootStatus::Bound(root)
            }
            Err(e) => {
                // Contract was validated in `new`; nothing else can fail.
                tracing::warn!(error = %e, "Header bind failed");
                BootStatus::Pending
            }
        }
    }

    /// Forward a UI event to the bound controller.
    pub fn dispatch<D: Dom>(&mut self, dom: &mut D, event: &UiEvent) -> Outcome {
        match self.controller.as_mut() {
            Some(controller) => controller.handle(dom, event),
            None => Outcome::Ignored,
        }
    }

    fn locate<D: Dom>(&self, dom: &D) -> Option<(ElementId, ElementId)> {
        let mount = dom.element_by_id(&self.config.mount_id)?;
        let selectors = self.config.selectors().ok()?;
        let root = selectors
            .header_roots
            .iter()
            .find_map(|selector| query(dom, mount, selector))?;
        Some((mount, root))
    }
}
