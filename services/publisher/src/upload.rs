//! Multipart form reading for video uploads

use axum::extract::multipart::{Field, Multipart, MultipartError};
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    models::{UploadRequest, VideoFile},
};

/// Read the `POST /upload_video` form into an [`UploadRequest`].
///
/// Field contents count against `limit` bytes in total; going past it fails
/// with [`ApiError::PayloadTooLarge`]. Unknown fields are skipped. A
/// repeated field keeps its last value.
pub async fn read_upload_form(mut multipart: Multipart, limit: usize) -> ApiResult<UploadRequest> {
    let mut request = UploadRequest::default();
    let mut consumed = 0usize;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        match name.as_str() {
            "video_file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = read_field(&mut field, &mut consumed, limit).await?;

                debug!(
                    "Received video file {:?} ({:?}, {} bytes)",
                    file_name,
                    content_type,
                    data.len()
                );
                request.video_file = Some(VideoFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "page_id" | "access_token" | "title" | "description" | "scheduled_time" => {
                let data = read_field(&mut field, &mut consumed, limit).await?;
                let value = String::from_utf8(data.to_vec()).map_err(|_| {
                    ApiError::InvalidInput(format!("Field '{}' is not valid UTF-8", name))
                })?;
                let slot = match name.as_str() {
                    "page_id" => &mut request.page_id,
                    "access_token" => &mut request.access_token,
                    "title" => &mut request.title,
                    "description" => &mut request.description,
                    _ => &mut request.scheduled_time,
                };
                *slot = Some(value);
            }
            other => {
                read_field(&mut field, &mut consumed, limit).await?;
                debug!("Ignoring unexpected form field '{}'", other);
            }
        }
    }

    Ok(request)
}

/// Drain a field chunk by chunk, charging its bytes to the form budget
async fn read_field(field: &mut Field<'_>, consumed: &mut usize, limit: usize) -> ApiResult<Bytes> {
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        *consumed += chunk.len();
        if *consumed > limit {
            return Err(ApiError::PayloadTooLarge(limit));
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

/// Malformed bodies are the caller's fault; stream failures are not
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status().is_client_error() {
        ApiError::InvalidInput(format!("Invalid multipart form: {}", err.body_text()))
    } else {
        ApiError::Unexpected(format!("Failed to read multipart form: {}", err))
    }
}
