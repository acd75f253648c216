//! Common library for the Page Video Publisher
//!
//! This crate provides the functionality shared by the publisher service:
//! the Graph API client that performs every outbound call, and the error
//! taxonomy those calls report.

pub mod error;
pub mod graph;

pub use error::{OutboundError, OutboundResult};
pub use graph::{GraphApi, GraphClient, GraphConfig, TokenExchange, VideoUpload};

/// Example usage of the graph module
///
/// ```rust,no_run
/// use common::graph::{GraphApi, GraphClient, GraphConfig, TokenExchange};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GraphClient::new(GraphConfig::default())?;
///     let token = client
///         .exchange_token(&TokenExchange {
///             app_id: "app-id".to_string(),
///             app_secret: "app-secret".to_string(),
///             short_token: "short-lived-token".to_string(),
///         })
///         .await?;
///     println!("Long-lived token: {}", token);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
