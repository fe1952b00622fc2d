//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc<ArcSwap> to all handlers
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<SiteConfig>
//!
//! Process environment:
//!     env.rs → EdgeEnv (secrets, captured once at startup)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Secrets never live in the config file

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use env::EdgeEnv;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CacheConfig, CorsConfig, ListenerConfig, ObservabilityConfig, Place, SiteConfig,
    TimeoutConfig, UpstreamConfig, WeatherConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
