//! HTTP Request/Response Types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GET /api/health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /api/search - raw query values, coerced by the core
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// POST /api/contact
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub lead_id: Value,
}

/// POST /api/cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearResponse {
    pub success: bool,
    pub message: &'static str,
}
