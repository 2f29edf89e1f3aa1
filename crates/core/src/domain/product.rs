// Product Domain Model

use crate::domain::record::{text_or_false, Many2One};
use serde::{Deserialize, Serialize};

/// ERP model backing storefront products
pub const PRODUCT_MODEL: &str = "product.template";

/// Fields requested for every product listing
pub const PRODUCT_FIELDS: &[&str] = &[
    "id",
    "name",
    "list_price",
    "categ_id",
    "image_1920",
    "description_sale",
    "default_code",
];

/// Extra field requested for the single-product view
pub const PRODUCT_DETAIL_FIELD: &str = "description";

const UNCATEGORIZED: &str = "Uncategorized";
const PLACEHOLDER_RATING: f64 = 4.5;
const PLACEHOLDER_COLOR: &str = "Chrome";

/// Product record as returned by `search_read`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default)]
    pub categ_id: Many2One,
    #[serde(default, deserialize_with = "text_or_false")]
    pub description_sale: Option<String>,
    #[serde(default, deserialize_with = "text_or_false")]
    pub default_code: Option<String>,
}

/// Website-facing product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub category_id: Option<i64>,
    pub image: String,
    pub thumbnail: String,
    pub description: String,
    pub sku: String,
    pub slug: String,
    pub rating: f64,
    pub color: String,
}

impl ProductView {
    /// Project an ERP record onto the website schema
    ///
    /// `base_url` is the ERP origin that serves product images.
    pub fn project(record: ProductRecord, base_url: &str) -> Self {
        let category = record
            .categ_id
            .label()
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        Self {
            id: record.id,
            price: record.list_price.unwrap_or(0.0),
            category,
            category_id: record.categ_id.id(),
            image: image_url(base_url, record.id, "image_1920"),
            thumbnail: image_url(base_url, record.id, "image_512"),
            description: record.description_sale.unwrap_or_default(),
            sku: record.default_code.unwrap_or_default(),
            slug: product_slug(&record.name, record.id),
            rating: PLACEHOLDER_RATING,
            color: PLACEHOLDER_COLOR.to_string(),
            name: record.name,
        }
    }
}

fn image_url(base_url: &str, id: i64, field: &str) -> String {
    format!("{}/web/image/{}/{}/{}", base_url, PRODUCT_MODEL, id, field)
}

/// SEO slug: `"Rain Shower"` with id 12 -> `"rain-shower-12"`
pub fn product_slug(name: &str, id: i64) -> String {
    let words: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    format!("{}-{}", words.join("-"), id)
}

/// Recover the product id from the trailing `-<digits>` of a slug
pub fn product_id_from_slug(slug: &str) -> Option<i64> {
    let (_, digits) = slug.rsplit_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://erp.example.com";

    fn record(value: serde_json::Value) -> ProductRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_project_with_category() {
        let view = ProductView::project(
            record(json!({
                "id": 42,
                "name": "Pool Pump XL",
                "list_price": 899.5,
                "categ_id": [7, "Pumps"],
                "image_1920": "aGVsbG8=",
                "description_sale": "Quiet and efficient",
                "default_code": "PMP-XL"
            })),
            BASE,
        );

        assert_eq!(view.category, "Pumps");
        assert_eq!(view.category_id, Some(7));
        assert_eq!(view.price, 899.5);
        assert_eq!(view.description, "Quiet and efficient");
        assert_eq!(view.sku, "PMP-XL");
        assert_eq!(
            view.image,
            "https://erp.example.com/web/image/product.template/42/image_1920"
        );
        assert_eq!(
            view.thumbnail,
            "https://erp.example.com/web/image/product.template/42/image_512"
        );
        assert_eq!(view.slug, "pool-pump-xl-42");
    }

    #[test]
    fn test_project_without_category() {
        let view = ProductView::project(
            record(json!({
                "id": 3,
                "name": "Filter",
                "categ_id": false,
                "description_sale": false,
                "default_code": false
            })),
            BASE,
        );

        assert_eq!(view.category, "Uncategorized");
        assert_eq!(view.category_id, None);
        assert_eq!(view.price, 0.0);
        assert_eq!(view.description, "");
        assert_eq!(view.sku, "");
        assert_eq!(view.rating, 4.5);
        assert_eq!(view.color, "Chrome");
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = ProductView::project(record(json!({"id": 1, "name": "Tap"})), BASE);
        let value = serde_json::to_value(&view).unwrap();

        assert!(value.get("categoryId").unwrap().is_null());
        assert!(value.get("category_id").is_none());
    }

    #[test]
    fn test_slug_roundtrip_id() {
        assert_eq!(product_slug("  Rain   Shower ", 12), "rain-shower-12");
        assert_eq!(product_id_from_slug("rain-shower-12"), Some(12));
        assert_eq!(product_id_from_slug("rain-shower"), None);
        assert_eq!(product_id_from_slug("12"), None);
        assert_eq!(product_id_from_slug("rain-"), None);
    }
}
