//! HTTP Error Types
//!
//! Maps application errors to status codes with an opaque `{"error": ...}` body.
//! The underlying cause is logged, never returned to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_core::error::AppError;
use thiserror::Error;
use tracing::{error, warn};

/// Client-facing error messages
pub mod message {
    pub const PRODUCTS: &str = "Failed to fetch products";
    pub const PRODUCT: &str = "Failed to fetch product";
    pub const CATEGORIES: &str = "Failed to fetch categories";
    pub const PUBLIC_CATEGORIES: &str = "Failed to fetch public categories";
    pub const PUBLIC_CATEGORY_TREE: &str = "Failed to build public category tree";
    pub const SEARCH: &str = "Search failed";
    pub const RIBBONS: &str = "Failed to fetch ribbons";
    pub const CONTACT: &str = "Failed to submit contact form";
    pub const PRODUCT_NOT_FOUND: &str = "Product not found";
    pub const INVALID_SLUG: &str = "Invalid product slug format";
    pub const INVALID_BODY: &str = "Invalid request body";
    pub const INVALID_CATEGORY_ID: &str = "Invalid category id";
}

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Convert AppError to an HTTP error
///
/// `failure` is the fixed message returned for anything that is not a
/// not-found or validation outcome.
pub fn to_api_error(err: AppError, failure: &'static str) -> ApiError {
    match err {
        AppError::NotFound(detail) => {
            warn!(detail = %detail, "Lookup returned no rows");
            ApiError::not_found(message::PRODUCT_NOT_FOUND)
        }
        AppError::Validation(detail) => {
            warn!(detail = %detail, "Rejected request");
            ApiError::bad_request(message::INVALID_SLUG)
        }
        other => {
            error!(error = %other, "{}", failure);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}
