//! Mobile menu state machine.
//!
//! # States
//! - Collapsed: menu closed, scroll released
//! - Expanded(Main): menu open on the main panel
//! - Expanded(Submenu(name)): menu open on a drill-down panel
//!
//! # State Transitions
//! ```text
//! Collapsed        → Expanded(Main): toggle
//! Expanded(_)      → Collapsed:      toggle, Escape, outside click,
//!                                    link click, desktop resize
//! Expanded(Main)   → Expanded(Submenu(name)): submenu trigger
//! Expanded(Submenu)→ Expanded(Main): back
//! ```
//!
//! Collapsing always forgets the panel, so the next open starts on `Main`.

/// Panel shown while the menu is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Main,
    /// Drill-down panel, named by its trigger's target attribute.
    Submenu(String),
}

static MAIN_PANEL: Panel = Panel::Main;

/// Menu state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Collapsed,
    Expanded(Panel),
}

impl MenuState {
    pub fn is_expanded(&self) -> bool {
        matches!(self, MenuState::Expanded(_))
    }

    /// Panel to render; a collapsed menu renders the main panel.
    pub fn panel(&self) -> &Panel {
        match self {
            MenuState::Expanded(panel) => panel,
            MenuState::Collapsed => &MAIN_PANEL,
        }
    }

    pub fn toggle(&self) -> MenuState {
        match self {
            MenuState::Collapsed => MenuState::Expanded(Panel::Main),
            MenuState::Expanded(_) => MenuState::Collapsed,
        }
    }

    /// Drill into a submenu. Ignored while collapsed.
    pub fn open_submenu(&self, name: &str) -> MenuState {
        match self {
            MenuState::Expanded(_) => MenuState::Expanded(Panel::Submenu(name.to_string())),
            MenuState::Collapsed => MenuState::Collapsed,
        }
    }

    pub fn back(&self) -> MenuState {
        match self {
            MenuState::Expanded(_) => MenuState::Expanded(Panel::Main),
            MenuState::Collapsed => MenuState::Collapsed,
        }
    }

    pub fn collapse(&self) -> MenuState {
        MenuState::Collapsed
    }
}
