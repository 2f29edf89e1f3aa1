//! Route Handlers
//!
//! One handler per endpoint: extract parameters, call the service, return JSON.

use crate::error::{message, to_api_error, ApiError};
use crate::types::{CacheClearResponse, ContactResponse, HealthResponse, SearchParams};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use storefront_core::application::{CatalogService, ContactService};
use storefront_core::domain::{
    CategoryNode, CategoryView, ContactForm, ProductView, PublicCategoryView, SearchCriteria,
};
use storefront_core::port::TimeProvider;
use tracing::{debug, warn};

/// Shared state with injected services
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub contact: Arc<ContactService>,
    pub time_provider: Arc<dyn TimeProvider>,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogService>,
        contact: Arc<ContactService>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            catalog,
            contact,
            time_provider,
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = DateTime::<Utc>::from_timestamp_millis(state.time_provider.now_millis())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "ok",
        timestamp: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    })
}

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Arc<Vec<ProductView>>> {
    state
        .catalog
        .list_products()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PRODUCTS))
}

/// GET /api/products/category/:name
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<ProductView>> {
    state
        .catalog
        .products_by_category(&name)
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PRODUCTS))
}

/// GET /api/products/:id
///
/// A non-numeric id cannot match any product and is answered with 404.
pub async fn product_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductView> {
    let Ok(id) = id.parse::<i64>() else {
        debug!(id = %id, "Non-numeric product id");
        return Err(ApiError::not_found(message::PRODUCT_NOT_FOUND));
    };

    state
        .catalog
        .product_by_id(id)
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PRODUCT))
}

/// GET /api/product/by-slug/:slug
pub async fn product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ProductView> {
    state
        .catalog
        .product_by_slug(&slug)
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PRODUCT))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Arc<Vec<CategoryView>>> {
    state
        .catalog
        .list_categories()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::CATEGORIES))
}

/// GET /api/categories/tree
pub async fn category_tree(State(state): State<AppState>) -> ApiResult<Vec<CategoryNode>> {
    state
        .catalog
        .category_tree()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::CATEGORIES))
}

/// GET /api/public-categories
pub async fn list_public_categories(
    State(state): State<AppState>,
) -> ApiResult<Arc<Vec<PublicCategoryView>>> {
    state
        .catalog
        .list_public_categories()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PUBLIC_CATEGORIES))
}

/// GET /api/public-categories/tree
pub async fn public_category_tree(
    State(state): State<AppState>,
) -> ApiResult<Vec<CategoryNode<PublicCategoryView>>> {
    state
        .catalog
        .public_category_tree()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PUBLIC_CATEGORY_TREE))
}

/// GET /api/products/public-category/:id
pub async fn products_by_public_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ProductView>> {
    let Ok(id) = id.parse::<i64>() else {
        debug!(id = %id, "Non-numeric public category id");
        return Err(ApiError::bad_request(message::INVALID_CATEGORY_ID));
    };

    state
        .catalog
        .products_by_public_category(id)
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::PRODUCTS))
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<ProductView>> {
    let criteria = SearchCriteria::from_params(
        params.q.as_deref(),
        params.min_price.as_deref(),
        params.max_price.as_deref(),
        params.category.as_deref(),
        params.sort.as_deref(),
    );

    state
        .catalog
        .search(&criteria)
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::SEARCH))
}

/// GET /api/ribbons
pub async fn list_ribbons(State(state): State<AppState>) -> ApiResult<Arc<Vec<Value>>> {
    state
        .catalog
        .list_ribbons()
        .await
        .map(Json)
        .map_err(|e| to_api_error(e, message::RIBBONS))
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<ContactResponse> {
    let Json(form) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Malformed contact form");
        ApiError::bad_request(message::INVALID_BODY)
    })?;

    let lead_id = state
        .contact
        .submit(form)
        .await
        .map_err(|e| to_api_error(e, message::CONTACT))?;

    Ok(Json(ContactResponse {
        success: true,
        lead_id,
    }))
}

/// POST /api/cache/clear
pub async fn clear_cache(State(state): State<AppState>) -> Json<CacheClearResponse> {
    state.catalog.clear_cache().await;

    Json(CacheClearResponse {
        success: true,
        message: "Cache cleared",
    })
}
