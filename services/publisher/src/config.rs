//! Service configuration
//!
//! Values come from defaults overlaid with `PUBLISHER_*` environment
//! variables. Nested keys use `__`, e.g. `PUBLISHER_GRAPH__API_VERSION`.

use common::graph::GraphConfig;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Configuration for the publisher service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    /// Graph API client settings
    pub graph: GraphConfig,
}

impl ServiceConfig {
    /// Create a new ServiceConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PUBLISHER_HOST` (default: "0.0.0.0")
    /// - `PUBLISHER_PORT` (default: 8000)
    /// - `PUBLISHER_MAX_UPLOAD_BYTES` (default: 1 GiB)
    /// - `PUBLISHER_GRAPH__GRAPH_BASE_URL` (default: "https://graph.facebook.com")
    /// - `PUBLISHER_GRAPH__VIDEO_BASE_URL` (default: "https://graph-video.facebook.com")
    /// - `PUBLISHER_GRAPH__API_VERSION` (default: "v19.0")
    /// - `PUBLISHER_GRAPH__TIMEOUT_SECS` (default: 120)
    /// - `PUBLISHER_GRAPH__UPLOAD_TIMEOUT_SECS` (default: 1800)
    ///
    /// The upload timeout bounds streaming the whole video to the Graph API,
    /// so it has to grow with `max_upload_bytes` on slow uplinks. Uploads that
    /// run past it fail as transport errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let graph = GraphConfig::default();

        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("max_upload_bytes", 1024_i64 * 1024 * 1024)?
            .set_default("graph.graph_base_url", graph.graph_base_url)?
            .set_default("graph.video_base_url", graph.video_base_url)?
            .set_default("graph.api_version", graph.api_version)?
            .set_default("graph.timeout_secs", graph.timeout_secs as i64)?
            .set_default(
                "graph.upload_timeout_secs",
                graph.upload_timeout_secs as i64,
            )?
            .add_source(
                Environment::with_prefix("PUBLISHER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address to listen on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check values the Graph client cannot work without
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }

        if self.graph.graph_base_url.is_empty() || self.graph.video_base_url.is_empty() {
            return Err("Graph API base URLs are required".to_string());
        }

        if self.graph.api_version.is_empty() {
            return Err("Graph API version is required".to_string());
        }

        if self.graph.timeout_secs == 0 || self.graph.upload_timeout_secs == 0 {
            return Err("Graph API timeouts must be greater than 0".to_string());
        }

        Ok(())
    }
}
