//! Experience Ecuador site edge library.
//!
//! Server side: the edge API (`/api/*`) proxying Open-Meteo, Cloudflare
//! Turnstile and the Apps Script web apps. Client side: the bilingual path
//! translator and the header controller, written against a `Dom` trait.

pub mod api;
pub mod cache;
pub mod config;
pub mod header;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use cache::ResponseCache;
pub use config::schema::SiteConfig;
pub use config::EdgeEnv;
pub use http::{AppState, HttpServer};
pub use i18n::{translate_path, Locale};
pub use lifecycle::Shutdown;
