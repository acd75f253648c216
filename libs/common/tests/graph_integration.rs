//! Integration tests for the Graph API client
//!
//! These tests exercise the client through the `GraphApi` trait object, the
//! way the publisher service holds it.

use std::sync::Arc;

use bytes::Bytes;
use common::{
    error::OutboundError,
    graph::{GraphApi, GraphClient, GraphConfig, TokenExchange, VideoUpload},
};
use mockito::Server;

fn graph_for(base_url: &str) -> Arc<dyn GraphApi> {
    let config = GraphConfig {
        graph_base_url: base_url.to_string(),
        video_base_url: base_url.to_string(),
        ..GraphConfig::default()
    };
    Arc::new(GraphClient::new(config).expect("Failed to build Graph client"))
}

#[tokio::test]
async fn test_both_operations_through_trait_object() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v19.0/777/videos")
        .with_status(200)
        .with_body(r#"{"id":"v-1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/v19.0/oauth/access_token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"access_token":"long"}"#)
        .create_async()
        .await;

    let graph = graph_for(&server.url());

    let video_id = graph
        .publish_video(VideoUpload {
            page_id: "777".to_string(),
            access_token: "page-token".to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            file_name: "clip.mp4".to_string(),
            video: Bytes::from_static(b"bytes"),
            scheduled_publish_time: None,
        })
        .await?;
    assert_eq!(video_id, "v-1", "Video upload returned the wrong id");

    let token = graph
        .exchange_token(&TokenExchange {
            app_id: "app".to_string(),
            app_secret: "secret".to_string(),
            short_token: "short".to_string(),
        })
        .await?;
    assert_eq!(token, "long", "Token exchange returned the wrong token");

    Ok(())
}

#[tokio::test]
async fn test_token_reply_without_token_is_missing_field() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v19.0/oauth/access_token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"token_type":"bearer"}"#)
        .create_async()
        .await;

    let err = graph_for(&server.url())
        .exchange_token(&TokenExchange {
            app_id: "app".to_string(),
            app_secret: "secret".to_string(),
            short_token: "short".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, OutboundError::MissingField("access_token")));
    assert!(!err.is_client_fault());
}
