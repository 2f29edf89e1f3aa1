// Catalog Service - product, category and ribbon use cases

use crate::application::cache::CacheStore;
use crate::domain::category::{CATEGORY_FIELDS, CATEGORY_MODEL};
use crate::domain::product::{PRODUCT_DETAIL_FIELD, PRODUCT_FIELDS, PRODUCT_MODEL};
use crate::domain::public_category::{
    PUBLIC_CATEGORY_FIELDS, PUBLIC_CATEGORY_MODEL, PUBLIC_CATEGORY_ORDER,
};
use crate::domain::{
    build_tree, product_id_from_slug, roll_up, CategoryNode, CategoryRecord, CategoryView,
    ProductRecord, ProductView, PublicCategoryRecord, PublicCategoryView, SearchCriteria,
    RIBBON_FIELDS, RIBBON_MODEL,
};
use crate::error::{AppError, Result};
use crate::port::{ErpGateway, Kwargs};
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Page size of the full (cached) product listing
const ALL_PRODUCTS_LIMIT: u32 = 500;
/// Page size of filtered listings and search
const FILTERED_LIMIT: u32 = 100;

/// Catalog Service
pub struct CatalogService {
    gateway: Arc<dyn ErpGateway>,
    cache: Arc<CacheStore>,
    base_url: String,
}

impl CatalogService {
    /// # Arguments
    ///
    /// * `gateway` - ERP gateway
    /// * `cache` - Shared response cache
    /// * `base_url` - ERP origin used to build product image URLs
    pub fn new(gateway: Arc<dyn ErpGateway>, cache: Arc<CacheStore>, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// All products, name ascending (cached)
    pub async fn list_products(&self) -> Result<Arc<Vec<ProductView>>> {
        self.cache
            .products
            .get_or_fetch(|| async {
                let mut kwargs = fields_kwargs(PRODUCT_FIELDS);
                kwargs.insert("limit".into(), json!(ALL_PRODUCTS_LIMIT));
                kwargs.insert("order".into(), json!("name asc"));

                let records: Vec<ProductRecord> =
                    self.search_read(PRODUCT_MODEL, Vec::new(), kwargs).await?;
                info!(count = records.len(), "Fetched product catalog");
                Ok(self.project_all(records))
            })
            .await
    }

    /// Products whose category name matches exactly
    pub async fn products_by_category(&self, category_name: &str) -> Result<Vec<ProductView>> {
        let mut kwargs = fields_kwargs(PRODUCT_FIELDS);
        kwargs.insert("limit".into(), json!(FILTERED_LIMIT));

        let domain = vec![json!(["categ_id.name", "=", category_name])];
        let records = self.search_read(PRODUCT_MODEL, domain, kwargs).await?;
        Ok(self.project_all(records))
    }

    /// Single product by id
    ///
    /// Returns `AppError::NotFound` when the ERP has no matching record.
    pub async fn product_by_id(&self, id: i64) -> Result<ProductView> {
        let mut fields = PRODUCT_FIELDS.to_vec();
        fields.push(PRODUCT_DETAIL_FIELD);

        let domain = vec![json!(["id", "=", id])];
        let records: Vec<ProductRecord> = self
            .search_read(PRODUCT_MODEL, domain, fields_kwargs(&fields))
            .await?;

        records
            .into_iter()
            .next()
            .map(|record| ProductView::project(record, &self.base_url))
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Single product by SEO slug (`name-words-<id>`)
    pub async fn product_by_slug(&self, slug: &str) -> Result<ProductView> {
        let id = product_id_from_slug(slug)
            .ok_or_else(|| AppError::Validation(format!("Invalid product slug: {}", slug)))?;
        self.product_by_id(id).await
    }

    /// All categories with product counts (cached)
    ///
    /// Issues one `search_count` per category.
    pub async fn list_categories(&self) -> Result<Arc<Vec<CategoryView>>> {
        self.cache
            .categories
            .get_or_fetch(|| async {
                let records: Vec<CategoryRecord> = self
                    .search_read(CATEGORY_MODEL, Vec::new(), fields_kwargs(CATEGORY_FIELDS))
                    .await?;

                let counts = try_join_all(records.iter().map(|record| self.count_products(record.id)))
                    .await?;

                info!(count = records.len(), "Fetched categories");
                Ok(records
                    .into_iter()
                    .zip(counts)
                    .map(|(record, count)| CategoryView::project(record, count))
                    .collect())
            })
            .await
    }

    /// Categories nested by parent
    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>> {
        let categories = self.list_categories().await?;
        Ok(build_tree(categories.as_slice()))
    }

    /// Website categories holding published products, by `sequence` (cached)
    ///
    /// Issues one `search_count` per category; empty branches are dropped.
    pub async fn list_public_categories(&self) -> Result<Arc<Vec<PublicCategoryView>>> {
        self.cache
            .public_categories
            .get_or_fetch(|| async {
                let mut kwargs = fields_kwargs(PUBLIC_CATEGORY_FIELDS);
                kwargs.insert("order".into(), json!(PUBLIC_CATEGORY_ORDER));

                let records: Vec<PublicCategoryRecord> = self
                    .search_read(PUBLIC_CATEGORY_MODEL, Vec::new(), kwargs)
                    .await?;

                let counts = try_join_all(
                    records
                        .iter()
                        .map(|record| self.count_published(record.id)),
                )
                .await?;

                let views = records
                    .into_iter()
                    .zip(counts)
                    .map(|(record, count)| PublicCategoryView::project(record, count))
                    .collect();
                let kept = roll_up(views);

                info!(count = kept.len(), "Fetched public categories");
                Ok(kept)
            })
            .await
    }

    /// Website categories nested by parent
    pub async fn public_category_tree(&self) -> Result<Vec<CategoryNode<PublicCategoryView>>> {
        let categories = self.list_public_categories().await?;
        Ok(build_tree(categories.as_slice()))
    }

    /// Published products in a website category
    pub async fn products_by_public_category(&self, category_id: i64) -> Result<Vec<ProductView>> {
        let mut kwargs = fields_kwargs(PRODUCT_FIELDS);
        kwargs.insert("limit".into(), json!(FILTERED_LIMIT));

        let records = self
            .search_read(PRODUCT_MODEL, published_in(category_id), kwargs)
            .await?;
        Ok(self.project_all(records))
    }

    /// Full-text, price-range and category search
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<ProductView>> {
        let mut kwargs = fields_kwargs(PRODUCT_FIELDS);
        kwargs.insert("limit".into(), json!(FILTERED_LIMIT));
        kwargs.insert("order".into(), json!(criteria.sort.as_order()));

        let records = self
            .search_read(PRODUCT_MODEL, criteria.domain(), kwargs)
            .await?;
        Ok(self.project_all(records))
    }

    /// Product ribbons, passed through unchanged (cached)
    pub async fn list_ribbons(&self) -> Result<Arc<Vec<Value>>> {
        self.cache
            .ribbons
            .get_or_fetch(|| async {
                self.search_read(RIBBON_MODEL, Vec::new(), fields_kwargs(RIBBON_FIELDS))
                    .await
            })
            .await
    }

    /// Drop every cached resource
    pub async fn clear_cache(&self) {
        self.cache.clear_all().await;
        info!("Cache cleared");
    }

    async fn count_products(&self, category_id: i64) -> Result<i64> {
        let domain = json!([["categ_id", "=", category_id]]);
        let count = self
            .gateway
            .call(PRODUCT_MODEL, "search_count", vec![domain], Kwargs::new())
            .await?;
        Ok(serde_json::from_value(count)?)
    }

    async fn count_published(&self, public_category_id: i64) -> Result<i64> {
        let domain = Value::Array(published_in(public_category_id));
        let count = self
            .gateway
            .call(PRODUCT_MODEL, "search_count", vec![domain], Kwargs::new())
            .await?;
        Ok(serde_json::from_value(count)?)
    }

    async fn search_read<T: DeserializeOwned>(
        &self,
        model: &str,
        domain: Vec<Value>,
        kwargs: Kwargs,
    ) -> Result<Vec<T>> {
        debug!(model, filters = domain.len(), "search_read");
        let result = self
            .gateway
            .call(model, "search_read", vec![Value::Array(domain)], kwargs)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    fn project_all(&self, records: Vec<ProductRecord>) -> Vec<ProductView> {
        records
            .into_iter()
            .map(|record| ProductView::project(record, &self.base_url))
            .collect()
    }
}

/// Domain selecting published products of a website category
fn published_in(public_category_id: i64) -> Vec<Value> {
    vec![
        json!(["public_categ_ids", "in", [public_category_id]]),
        json!(["is_published", "=", true]),
    ]
}

fn fields_kwargs(fields: &[&str]) -> Kwargs {
    let mut kwargs = Kwargs::new();
    kwargs.insert("fields".into(), json!(fields));
    kwargs
}
