//! Graph API client for the Page Video Publisher
//!
//! This module performs the outbound calls to the Graph API and normalizes
//! every way such a call can fail into an [`OutboundError`]. Each call is
//! attempted exactly once.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Client, RequestBuilder,
    multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::error::{OutboundError, OutboundResult};

/// Content type attached to every uploaded video part
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Grant type requested from the token exchange endpoint
pub const EXCHANGE_GRANT_TYPE: &str = "fb_exchange_token";

/// Configuration for the Graph API client
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Base URL for regular Graph API calls
    pub graph_base_url: String,
    /// Base URL for video uploads
    pub video_base_url: String,
    /// API version segment, e.g. "v19.0"
    pub api_version: String,
    /// Connect timeout, and total timeout for calls without a video body, in seconds
    pub timeout_secs: u64,
    /// Total timeout for a video upload, body streaming included, in seconds
    pub upload_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_base_url: "https://graph.facebook.com".to_string(),
            video_base_url: "https://graph-video.facebook.com".to_string(),
            api_version: "v19.0".to_string(),
            timeout_secs: 120,
            upload_timeout_secs: 1800,
        }
    }
}

/// A video ready to be sent to a page
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub page_id: String,
    pub access_token: String,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub video: Bytes,
    /// Unix epoch seconds; `None` publishes immediately
    pub scheduled_publish_time: Option<i64>,
}

/// Parameters for exchanging a short-lived user token
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub app_id: String,
    pub app_secret: String,
    pub short_token: String,
}

/// Operations the service needs from the Graph API
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Upload a video to a page and return the created video id
    async fn publish_video(&self, upload: VideoUpload) -> OutboundResult<String>;

    /// Exchange a short-lived user token for a long-lived one
    async fn exchange_token(&self, exchange: &TokenExchange) -> OutboundResult<String>;
}

/// Error object as returned by the Graph API
#[derive(Debug, Deserialize)]
pub struct GraphErrorDetail {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<i64>,
    pub error_subcode: Option<i64>,
    pub fbtrace_id: Option<String>,
}

/// The `error` member of a reply, in whichever shape it arrived
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphErrorField {
    Structured(GraphErrorDetail),
    Plain(String),
    Other(serde_json::Value),
}

impl GraphErrorField {
    fn into_outbound(self, status: u16) -> OutboundError {
        match self {
            GraphErrorField::Structured(detail) => {
                let message = detail.message.unwrap_or_else(|| {
                    format!(
                        "Graph API error (type: {}, code: {})",
                        detail.kind.as_deref().unwrap_or("unknown"),
                        detail
                            .code
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "none".to_string())
                    )
                });
                if let Some(trace) = detail.fbtrace_id.as_deref() {
                    debug!("Graph API error trace id: {}", trace);
                }
                OutboundError::Upstream {
                    status,
                    message,
                    code: detail.code,
                }
            }
            GraphErrorField::Plain(message) => OutboundError::Upstream {
                status,
                message,
                code: None,
            },
            GraphErrorField::Other(value) => OutboundError::Upstream {
                status,
                message: value.to_string(),
                code: None,
            },
        }
    }
}

/// A reply body: an optional error object next to the expected fields
#[derive(Debug, Deserialize)]
struct GraphReply<T> {
    #[serde(default)]
    error: Option<GraphErrorField>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GraphErrorField,
}

/// Success fields of a video upload reply
#[derive(Debug, Deserialize)]
struct VideoCreated {
    id: Option<String>,
}

/// Success fields of a token exchange reply
#[derive(Debug, Deserialize)]
struct TokenGranted {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}

/// Whether a page id is safe to splice into the upload path.
///
/// Only ASCII letters, digits and `_` are accepted, so values such as `..`
/// cannot move the request to another endpoint.
pub fn is_valid_page_id(page_id: &str) -> bool {
    !page_id.is_empty()
        && page_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Text fields of the upload form, in the order they are sent
pub fn video_form_fields(upload: &VideoUpload) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("access_token", upload.access_token.clone()),
        ("title", upload.title.clone()),
        ("description", upload.description.clone()),
    ];

    if let Some(publish_time) = upload.scheduled_publish_time {
        fields.push(("published", "false".to_string()));
        fields.push(("scheduled_publish_time", publish_time.to_string()));
    }

    fields
}

/// Graph API client backed by reqwest
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    config: GraphConfig,
}

impl GraphClient {
    /// Build a client with the configured connect timeout.
    ///
    /// Total timeouts are set per request: uploads stream the whole video
    /// within `upload_timeout_secs`, every other call gets `timeout_secs`.
    pub fn new(config: GraphConfig) -> OutboundResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OutboundError::InvalidRequest(e.to_string()))?;

        info!(
            "Graph API client initialized for {} (timeout {}s, upload timeout {}s)",
            config.api_version, config.timeout_secs, config.upload_timeout_secs
        );
        Ok(Self { http, config })
    }

    /// Video upload endpoint for a page
    pub fn videos_url(&self, page_id: &str) -> String {
        format!(
            "{}/{}/{}/videos",
            self.config.video_base_url.trim_end_matches('/'),
            self.config.api_version,
            page_id
        )
    }

    /// Token exchange endpoint
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth/access_token",
            self.config.graph_base_url.trim_end_matches('/'),
            self.config.api_version
        )
    }

    /// Send a request once and decode the reply
    async fn dispatch<T: DeserializeOwned>(&self, request: RequestBuilder) -> OutboundResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| OutboundError::from(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OutboundError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            warn!("Graph API responded with status {}", status);
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => envelope.error.into_outbound(status.as_u16()),
                Err(_) => OutboundError::Upstream {
                    status: status.as_u16(),
                    message: format!(
                        "Graph API request failed with status {}: {}",
                        status.as_u16(),
                        text
                    ),
                    code: None,
                },
            });
        }

        let reply: GraphReply<T> = serde_json::from_str(&text)
            .map_err(|e| OutboundError::MalformedResponse(e.to_string()))?;

        if let Some(error) = reply.error {
            return Err(error.into_outbound(status.as_u16()));
        }

        Ok(reply.body)
    }
}

#[async_trait]
impl GraphApi for GraphClient {
    async fn publish_video(&self, upload: VideoUpload) -> OutboundResult<String> {
        if !is_valid_page_id(&upload.page_id) {
            return Err(OutboundError::InvalidRequest(format!(
                "invalid page id '{}'",
                upload.page_id
            )));
        }

        info!(
            "Uploading video '{}' ({} bytes) to page {}",
            upload.file_name,
            upload.video.len(),
            upload.page_id
        );

        let mut form = Form::new();
        for (name, value) in video_form_fields(&upload) {
            form = form.text(name, value);
        }

        let length = upload.video.len() as u64;
        let source = Part::stream_with_length(upload.video, length)
            .file_name(upload.file_name)
            .mime_str(VIDEO_CONTENT_TYPE)?;
        form = form.part("source", source);

        let request = self
            .http
            .post(self.videos_url(&upload.page_id))
            .timeout(Duration::from_secs(self.config.upload_timeout_secs))
            .multipart(form);
        let created: VideoCreated = self.dispatch(request).await?;

        created.id.ok_or(OutboundError::MissingField("id"))
    }

    async fn exchange_token(&self, exchange: &TokenExchange) -> OutboundResult<String> {
        info!("Exchanging short-lived token for app {}", exchange.app_id);

        let request = self
            .http
            .get(self.token_url())
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .query(&[
                ("grant_type", EXCHANGE_GRANT_TYPE),
                ("client_id", exchange.app_id.as_str()),
                ("client_secret", exchange.app_secret.as_str()),
                ("fb_exchange_token", exchange.short_token.as_str()),
            ]);
        let granted: TokenGranted = self.dispatch(request).await?;

        debug!(
            "Token exchange granted type {:?}, expires in {:?}s",
            granted.token_type, granted.expires_in
        );
        granted
            .access_token
            .ok_or(OutboundError::MissingField("access_token"))
    }
}
