//! Page Video Publisher service
//!
//! Proxies video uploads and token exchanges to the Graph API. Each request
//! is validated, reshaped, forwarded once, and answered with JSON.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod state;
pub mod upload;

pub use routes::create_router;
pub use state::AppState;
