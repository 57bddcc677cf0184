//! HTTP client for the external analytics service.
//!
//! The service owns the seismic catalogue and every statistical model
//! (STL, Holt-Winters, RFM, LSTM). Responses are relayed as opaque JSON.

use std::{str::FromStr, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsEndpoint {
    Stl,
    Predict,
    Rfm,
    Numbers,
    Lstm,
    Seisms,
}

impl AnalyticsEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            AnalyticsEndpoint::Stl => "stl",
            AnalyticsEndpoint::Predict => "predict",
            AnalyticsEndpoint::Rfm => "rfm",
            AnalyticsEndpoint::Numbers => "numbers",
            AnalyticsEndpoint::Lstm => "lstm",
            AnalyticsEndpoint::Seisms => "seisms",
        }
    }
}

impl FromStr for AnalyticsEndpoint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stl" => Ok(AnalyticsEndpoint::Stl),
            "predict" => Ok(AnalyticsEndpoint::Predict),
            "rfm" => Ok(AnalyticsEndpoint::Rfm),
            "numbers" => Ok(AnalyticsEndpoint::Numbers),
            "lstm" => Ok(AnalyticsEndpoint::Lstm),
            "seisms" => Ok(AnalyticsEndpoint::Seisms),
            other => Err(AppError::NotFound(format!(
                "Unknown analytics endpoint '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    base_url: String,
}

impl AnalyticsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, endpoint: AnalyticsEndpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    /// Single GET, no retry. Any transport, status or decoding failure is a 502.
    pub async fn fetch(
        &self,
        endpoint: AnalyticsEndpoint,
        query: &[(String, String)],
    ) -> AppResult<Value> {
        let url = self.url_for(endpoint);
        tracing::debug!(%url, ?query, "calling analytics service");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("{url} answered {status}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("{url}: invalid JSON body: {e}")))
    }
}
