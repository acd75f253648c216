//! Publisher service routes

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Query, State,
        multipart::{Multipart, MultipartRejection},
        rejection::QueryRejection,
    },
    http::{HeaderMap, header},
    response::IntoResponse,
    routing::{get, post},
};
use common::graph::{TokenExchange, VideoUpload};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{TokenExchangeQuery, TokenExchangeResponse, UploadResponse},
    schedule::{self, ScheduleDecision},
    state::AppState,
    upload::read_upload_form,
};

/// Create the router for the publisher service
///
/// The upload route enforces `max_upload_bytes` itself while reading the
/// form, so axum's default body limit is lifted there.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/upload_video",
            post(upload_video).layer(DefaultBodyLimit::disable()),
        )
        .route("/exchange_token", post(exchange_token))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Service is running"
    }))
}

/// Upload a video to a page, optionally scheduled
pub async fn upload_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let declared_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_length.is_some_and(|length| length > state.max_upload_bytes) {
        return Err(ApiError::PayloadTooLarge(state.max_upload_bytes));
    }

    let multipart = multipart.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let upload = read_upload_form(multipart, state.max_upload_bytes)
        .await?
        .validate()?;

    let decision = schedule::decide(upload.scheduled_time.as_deref(), state.clock.now())?;
    match decision {
        ScheduleDecision::Immediate => {
            info!("Publishing video to page {} immediately", upload.page_id)
        }
        ScheduleDecision::ScheduledAt(epoch) => info!(
            "Scheduling video for page {} at {}",
            upload.page_id, epoch
        ),
    }

    let video_id = state
        .graph
        .publish_video(VideoUpload {
            page_id: upload.page_id,
            access_token: upload.access_token,
            title: upload.title,
            description: upload.description,
            file_name: upload.file_name,
            video: upload.video,
            scheduled_publish_time: decision.publish_time(),
        })
        .await?;

    info!("Video {} created", video_id);
    Ok(Json(UploadResponse {
        status: "success".to_string(),
        video_id,
    }))
}

/// Exchange a short-lived user token for a long-lived one
pub async fn exchange_token(
    State(state): State<AppState>,
    query: Result<Query<TokenExchangeQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let request = query.validate()?;

    let token = state
        .graph
        .exchange_token(&TokenExchange {
            app_id: request.app_id,
            app_secret: request.app_secret,
            short_token: request.short_token,
        })
        .await
        .map_err(ApiError::from_token_exchange)?;

    Ok(Json(TokenExchangeResponse {
        status: "success".to_string(),
        long_lived_user_token: token,
    }))
}
