//! Stub astrology backend for integration tests
//!
//! Serves `/birth-chart`, `/chat` and `/health` on an ephemeral port and
//! records every request body it receives.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

#[derive(Default)]
pub struct Stub {
    pub chart_requests: Mutex<Vec<Value>>,
    pub chat_requests: Mutex<Vec<Value>>,
    pub fail_chart: AtomicBool,
    pub fail_chat: AtomicBool,
    pub garbled_chat: AtomicBool,
}

impl Stub {
    pub fn chart_requests(&self) -> Vec<Value> {
        self.chart_requests.lock().unwrap().clone()
    }

    pub fn chat_requests(&self) -> Vec<Value> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn set_fail_chat(&self, fail: bool) {
        self.fail_chat.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_chart(&self, fail: bool) {
        self.fail_chart.store(fail, Ordering::SeqCst);
    }
}

/// Chart body as the backend writes it; planets are deliberately not in
/// alphabetical order
pub const CHART_DATA: &str = r#"{
    "birth_details": {"date": "1990-05-15", "time": "14:30", "ayanamsa": 23.72},
    "ascendant": {"longitude": 132.5, "sign": "Leo", "sign_num": 4, "degree": 12.5},
    "planets": {
        "Sun": {"longitude": 30.75, "sign": "Taurus", "sign_num": 1, "degree": 0.75, "nakshatra": "Krittika", "house": null},
        "Moon": {"longitude": 352.1, "sign": "Pisces", "sign_num": 11, "degree": 22.1, "nakshatra": "Revati", "house": null},
        "Jupiter": {"longitude": 72.0, "sign": "Gemini", "sign_num": 2, "degree": 12.0, "nakshatra": "Ardra", "house": null}
    },
    "houses": [
        {"house": 1, "cusp_longitude": 132.5, "sign": "Leo", "description": "Self, personality, physical body"},
        {"house": 7, "cusp_longitude": 312.5, "sign": "Aquarius", "description": "Marriage, partnerships, business"}
    ],
    "moon_nakshatra": {"name": "Revati", "pada": 3, "lord": "Mercury"},
    "strengths": {
        "Sun": {"score": 50, "status": "Moderate"},
        "Moon": {"score": 80.4, "status": "Strong"}
    },
    "interpretation": {
        "ascendant_sign": "Your rising sign (Lagna) is Leo."
    }
}"#;

/// Written as raw text so key order survives the trip to the client
async fn birth_chart(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    let count = {
        let mut requests = stub.chart_requests.lock().unwrap();
        requests.push(body);
        requests.len()
    };

    if stub.fail_chart.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "ephemeris unavailable"})),
        )
            .into_response();
    }

    let body = format!(
        r#"{{"session_id": "session_{}", "chart_data": {}, "message": "Birth chart calculated successfully"}}"#,
        count - 1,
        CHART_DATA
    );
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn chat(
    State(stub): State<Arc<Stub>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    stub.chat_requests.lock().unwrap().push(body.clone());

    if stub.fail_chat.load(Ordering::SeqCst) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Session not found. Please create a birth chart first."})),
        ));
    }
    if stub.garbled_chat.load(Ordering::SeqCst) {
        return Ok(Json(json!({"answer": "wrong shape"})));
    }

    Ok(Json(json!({
        "response": format!("[{}] {}", body["context"].as_str().unwrap_or("?"), body["message"].as_str().unwrap_or("")),
        "session_id": body["session_id"]
    })))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "model": "gpt-4o-mini"}))
}

/// Start the stub; returns its base URL
pub async fn spawn(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route("/birth-chart", post(birth_chart))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL nothing listens on
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
