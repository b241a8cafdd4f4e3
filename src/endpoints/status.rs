use serde::Deserialize;

use crate::{Client, RequestDescriptor, Response, Result};

/// Endpoints under `/status`.
pub struct Status<'a> {
    client: &'a Client,
}

/// Quota, usage and identity of the calling API key.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyStatus {
    pub api_key: ApiKeyInfo,
    pub limits: Limits,
    pub usage: Usage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyInfo {
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    pub hourly: Quota,
    pub daily: DailyLimits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyLimits {
    pub requests: Quota,
    pub tokens: Quota,
}

/// A limit and what is left of it. `None` means unlimited.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Quota {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub today: UsagePeriod,
    pub last_30_days: UsagePeriod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsagePeriod {
    pub requests: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
    /// Percentage, only reported for longer periods.
    #[serde(default)]
    pub success_rate: Option<f64>,
}

/// Per-model usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStats {
    pub summary: ModelSummary,
    #[serde(default)]
    pub models: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSummary {
    pub total_models: u64,
    pub total_requests: u64,
    pub total_tokens: u64,
}

impl<'a> Status<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `GET /status`
    pub async fn key(&self) -> Result<Response<KeyStatus>> {
        self.client.call(RequestDescriptor::get("/status")).await
    }

    /// `GET /status/models`, optionally restricted to the last `days` days.
    pub async fn models(&self, days: Option<u32>) -> Result<Response<ModelStats>> {
        let descriptor =
            RequestDescriptor::get("/status/models").with_optional_query_param("days", days);
        self.client.call(descriptor).await
    }
}
