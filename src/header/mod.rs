//! Header/navigation controller for the injected site header.
//!
//! Written against the `Dom` trait so the same controller drives a browser
//! document or the in-memory `Fragment`.

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod dom;
pub mod dropdown;
pub mod fragment;
pub mod language;
pub mod selector;
pub mod state;
pub mod tracking;

use thiserror::Error;

pub use bootstrap::{BootStatus, HeaderBootstrap, MountEvent};
pub use config::HeaderConfig;
pub use controller::{HeaderController, MobileMenu, Outcome, UiEvent};
pub use dom::{Dom, ElementId, Rect, ScrollLock};
pub use dropdown::{clamp_offset, DropdownSet};
pub use fragment::Fragment;
pub use language::LanguageState;
pub use selector::{Selector, SelectorError};
pub use state::{MenuState, Panel};
pub use tracking::{EventTracker, PageEvent, TrackingEvent, TrackingSink};

/// Header controller errors.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid header contract: {}", describe(.0))]
    InvalidContract(Vec<(String, SelectorError)>),
}

fn describe(errors: &[(String, SelectorError)]) -> String {
    errors
        .iter()
        .map(|(field, e)| format!("{field}: {e}"))
        .collect::<Vec<_>>()
        .join("; ")
}
