// Odoo ErpGateway Implementation

use crate::envelope::{decode_response, RpcRequest, CALL_KW_PATH};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;
use storefront_core::error::{AppError, Result};
use storefront_core::port::{ErpGateway, Kwargs, TimeProvider};
use tracing::{debug, error};

/// Connection settings for the ERP
#[derive(Debug, Clone)]
pub struct OdooConfig {
    /// Origin of the ERP, e.g. `https://erp.example.com`
    pub base_url: String,
    /// Database name (kept for completeness, not sent on `call_kw`)
    pub database: String,
    /// API token sent as a bearer credential
    pub api_key: String,
}

impl OdooConfig {
    pub fn new(
        base_url: impl Into<String>,
        database: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            database: database.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CALL_KW_PATH)
    }
}

/// JSON-RPC client for Odoo's `call_kw` endpoint
///
/// Single unretried POST per call; no client-side timeout.
pub struct OdooClient {
    http: reqwest::Client,
    config: OdooConfig,
    time_provider: Arc<dyn TimeProvider>,
}

impl OdooClient {
    pub fn new(config: OdooConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            time_provider,
        }
    }

    pub fn config(&self) -> &OdooConfig {
        &self.config
    }
}

// Helper to convert reqwest::Error to AppError
fn map_reqwest_error(err: reqwest::Error) -> AppError {
    if err.is_connect() {
        AppError::Transport(format!("Connection failed: {}", err))
    } else if err.is_decode() || err.is_body() {
        AppError::Transport(format!("Failed to read response: {}", err))
    } else {
        AppError::Transport(err.to_string())
    }
}

#[async_trait]
impl ErpGateway for OdooClient {
    async fn call(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Kwargs,
    ) -> Result<Value> {
        let id = self.time_provider.now_millis();
        let request = RpcRequest::call(model, method, args, kwargs, id);

        debug!(model, method, id, "Calling ERP");

        let response = self
            .http
            .post(self.config.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        decode_response(&body).inspect_err(|e| {
            error!(model, method, status = %status, error = %e, "ERP call failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::port::time_provider::mocks::ManualClock;

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = OdooConfig::new("https://erp.example.com/", "prod", "secret");
        assert_eq!(config.base_url, "https://erp.example.com");
        assert_eq!(config.endpoint(), "https://erp.example.com/web/dataset/call_kw");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let config = OdooConfig::new("http://127.0.0.1:9", "db", "key");
        let client = OdooClient::new(config, Arc::new(ManualClock::new(1)));

        let err = client
            .call("product.template", "search_read", vec![], Kwargs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
