// src/api/client.rs
// reqwest implementation of the Backend trait

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::Backend;
use super::types::{
    BirthChartRequest, BirthChartResponse, ChatRequest, ChatResponse, ErrorBody, HealthStatus,
};
use crate::error::{ClientError, Result};

/// HTTP client for the astrology backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client rooted at `base_url` (trailing slashes are dropped)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<Resp: DeserializeOwned>(response: reqwest::Response) -> Result<Resp> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.detail_text())
                .unwrap_or_else(|_| preview(&text).to_string());
            return Err(ClientError::Backend {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            debug!("Unparseable response body: {}", preview(&text));
            ClientError::Json(e)
        })
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn birth_chart(&self, request: &BirthChartRequest) -> Result<BirthChartResponse> {
        self.post_json("/birth-chart", request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post_json("/chat", request).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = self.url("/health");
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        Self::read_json(response).await
    }
}
