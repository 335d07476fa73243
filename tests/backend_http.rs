//! HttpBackend against a stub server

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jyotish::api::{Backend, BirthChartRequest, ChatRequest, HttpBackend};
use jyotish::{ClientError, FocusContext};
use serde_json::json;

fn delhi_request() -> BirthChartRequest {
    BirthChartRequest {
        date: "1990-05-15".into(),
        time: "14:30".into(),
        latitude: 28.7041,
        longitude: 77.1025,
        timezone: "Asia/Kolkata".into(),
        name: String::new(),
    }
}

#[tokio::test]
async fn birth_chart_posts_exact_body() {
    let stub = Arc::new(common::Stub::default());
    let url = common::spawn(Arc::clone(&stub)).await;
    let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

    let response = backend.birth_chart(&delhi_request()).await.unwrap();

    assert_eq!(response.session_id, "session_0");
    assert_eq!(response.chart_data.ascendant.sign, "Leo");
    assert_eq!(response.chart_data.moon_sign(), Some("Pisces"));
    assert_eq!(response.message.as_deref(), Some("Birth chart calculated successfully"));

    let planets: Vec<&str> = response.chart_data.planets.iter().map(|(name, _)| name).collect();
    assert_eq!(planets, vec!["Sun", "Moon", "Jupiter"]);

    assert_eq!(
        stub.chart_requests(),
        vec![json!({
            "date": "1990-05-15",
            "time": "14:30",
            "latitude": 28.7041,
            "longitude": 77.1025,
            "timezone": "Asia/Kolkata",
            "name": ""
        })]
    );
}

#[tokio::test]
async fn chat_sends_session_message_and_context() {
    let stub = Arc::new(common::Stub::default());
    let url = common::spawn(Arc::clone(&stub)).await;
    let backend = HttpBackend::new(format!("{}/", url), Duration::from_secs(5)).unwrap();

    let response = backend
        .chat(&ChatRequest {
            session_id: "session_9".into(),
            message: "What are my financial prospects?".into(),
            context: FocusContext::Finance,
        })
        .await
        .unwrap();

    assert_eq!(response.response, "[finance] What are my financial prospects?");
    assert_eq!(response.session_id.as_deref(), Some("session_9"));
    assert_eq!(
        stub.chat_requests(),
        vec![json!({
            "session_id": "session_9",
            "message": "What are my financial prospects?",
            "context": "finance"
        })]
    );
}

#[tokio::test]
async fn error_status_carries_backend_detail() {
    let stub = Arc::new(common::Stub::default());
    stub.set_fail_chat(true);
    let url = common::spawn(Arc::clone(&stub)).await;
    let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

    let err = backend
        .chat(&ChatRequest {
            session_id: "missing".into(),
            message: "hello".into(),
            context: FocusContext::General,
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Backend { status, detail } => {
            assert_eq!(status, 404);
            assert!(detail.starts_with("Session not found"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_body_is_json_error() {
    let stub = Arc::new(common::Stub::default());
    stub.garbled_chat.store(true, Ordering::SeqCst);
    let url = common::spawn(Arc::clone(&stub)).await;
    let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

    let err = backend
        .chat(&ChatRequest {
            session_id: "session_0".into(),
            message: "hello".into(),
            context: FocusContext::General,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Json(_)));
}

#[tokio::test]
async fn health_reports_status_and_model() {
    let stub = Arc::new(common::Stub::default());
    let url = common::spawn(stub).await;
    let backend = HttpBackend::new(url, Duration::from_secs(5)).unwrap();

    let health = backend.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.model.as_deref(), Some("gpt-4o-mini"));
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let backend = HttpBackend::new(common::dead_url().await, Duration::from_secs(5)).unwrap();
    let err = backend.birth_chart(&delhi_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert!(err.is_backend_failure());
}
