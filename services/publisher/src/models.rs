//! Request and response payloads

use bytes::Bytes;
use common::graph::{VIDEO_CONTENT_TYPE, is_valid_page_id};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Filename used when the client did not declare one
pub const DEFAULT_VIDEO_FILENAME: &str = "video.mp4";

/// Uploaded video file
#[derive(Debug, Clone)]
pub struct VideoFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Multipart form of `POST /upload_video`, as received
#[derive(Debug, Default)]
pub struct UploadRequest {
    pub page_id: Option<String>,
    pub access_token: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_time: Option<String>,
    pub video_file: Option<VideoFile>,
}

/// Upload request whose required fields are all present and non-empty
#[derive(Debug, Clone)]
pub struct ValidUpload {
    pub page_id: String,
    pub access_token: String,
    pub title: String,
    pub description: String,
    pub scheduled_time: Option<String>,
    pub file_name: String,
    pub video: Bytes,
}

impl UploadRequest {
    /// Check every required field, reporting the first one missing
    pub fn validate(self) -> ApiResult<ValidUpload> {
        let page_id = required("page_id", self.page_id)?;
        if !is_valid_page_id(&page_id) {
            return Err(ApiError::InvalidInput(
                "page_id may only contain letters, digits and '_'".to_string(),
            ));
        }

        let access_token = required("access_token", self.access_token)?;
        let title = required("title", self.title)?;
        let description = required("description", self.description)?;

        let video_file = self
            .video_file
            .filter(|file| !file.data.is_empty())
            .ok_or_else(|| missing("video_file"))?;

        match video_file.content_type.as_deref() {
            Some(declared) if !declared.starts_with("video/") => debug!(
                "video_file declared as '{}', forwarding as {}",
                declared, VIDEO_CONTENT_TYPE
            ),
            _ => {}
        }

        let file_name = video_file
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VIDEO_FILENAME.to_string());

        Ok(ValidUpload {
            page_id,
            access_token,
            title,
            description,
            scheduled_time: self.scheduled_time,
            file_name,
            video: video_file.data,
        })
    }
}

/// Query string of `POST /exchange_token`
///
/// Fields are optional so absence is reported as a JSON error rather than
/// an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TokenExchangeQuery {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub short_token: Option<String>,
}

/// Token exchange request whose fields are all present and non-empty
#[derive(Debug, Clone)]
pub struct TokenExchangeRequest {
    pub app_id: String,
    pub app_secret: String,
    pub short_token: String,
}

impl TokenExchangeQuery {
    pub fn validate(self) -> ApiResult<TokenExchangeRequest> {
        Ok(TokenExchangeRequest {
            app_id: required("app_id", self.app_id)?,
            app_secret: required("app_secret", self.app_secret)?,
            short_token: required("short_token", self.short_token)?,
        })
    }
}

/// Response for a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub video_id: String,
}

/// Response for a successful token exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
    pub status: String,
    pub long_lived_user_token: String,
}

fn missing(field: &str) -> ApiError {
    ApiError::InvalidInput(format!("Missing required field: {}", field))
}

fn required(field: &str, value: Option<String>) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(field))
}
