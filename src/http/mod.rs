//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, state)
//!     → request.rs (request ID, client IP, content type)
//!     → api/* handlers (+ cors.rs for the contact relay)
//!     → response.rs (JSON envelope, cache headers, error codes)
//!     → Send to client
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
