// src/api/mod.rs
// Backend collaborator: the chart and chat endpoints

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpBackend;
pub use types::*;

/// The external astrology service
///
/// Implemented over HTTP by [`HttpBackend`]; tests swap in scripted backends.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Compute a chart and open a backend session
    async fn birth_chart(&self, request: &BirthChartRequest) -> Result<BirthChartResponse>;

    /// Ask a question within an existing session
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Liveness probe
    async fn health(&self) -> Result<HealthStatus>;
}
