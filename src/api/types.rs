// src/api/types.rs
// Wire types for the chart and chat endpoints

use serde::{Deserialize, Serialize};

use crate::chart::ChartSnapshot;
use crate::conversation::FocusContext;

/// Body of `POST /birth-chart`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthChartRequest {
    pub date: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Empty when the user gave no name
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BirthChartResponse {
    pub session_id: String,
    pub chart_data: ChartSnapshot,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    pub context: FocusContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Error body the backend sends with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// `detail` is a string for handled errors and a list for request validation errors
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
