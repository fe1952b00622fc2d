//! Bilingual (English/Spanish) site path handling.
//!
//! # Data Flow
//! ```text
//! raw href / location.pathname
//!     → path.rs (normalize: strip ?query/#fragment, force /.../, collapse //)
//!     → locale.rs (detect current locale from the path)
//!     → translate.rs (explicit table → prefix rules → locale root)
//!     → normalized path in the target locale
//! ```
//!
//! # Design Decisions
//! - The explicit table is the only static data; the reverse map is derived once
//! - Translation is total: the worst case is the locale root, never an error
//! - Shared by the header controller and the CLI

pub mod locale;
pub mod path;
pub mod table;
pub mod translate;

pub use locale::Locale;
pub use path::{is_rewritable_link, normalize_path};
pub use translate::translate_path;
