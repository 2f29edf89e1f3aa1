// Search Criteria -> ERP domain filter

use serde_json::{json, Value};

/// Result ordering accepted by `/api/search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NameAsc,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    /// Unrecognized or missing values fall back to name ascending
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-low") => SortOrder::PriceAsc,
            Some("price-high") => SortOrder::PriceDesc,
            // "rating" has no backing field, sorts by name
            _ => SortOrder::NameAsc,
        }
    }

    pub fn as_order(&self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name asc",
            SortOrder::PriceAsc => "list_price asc",
            SortOrder::PriceDesc => "list_price desc",
        }
    }
}

/// Parsed `/api/search` parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub text: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl SearchCriteria {
    /// Build criteria from raw query values
    ///
    /// Empty strings count as absent; prices that do not parse are ignored.
    pub fn from_params(
        q: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        category: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            text: non_empty(q),
            min_price: parse_price(min_price),
            max_price: parse_price(max_price),
            category: non_empty(category),
            sort: SortOrder::from_param(sort),
        }
    }

    /// ERP domain: a list of `[field, operator, value]` triples (implicit AND)
    pub fn domain(&self) -> Vec<Value> {
        let mut domain = Vec::new();

        if let Some(text) = &self.text {
            domain.push(json!(["name", "ilike", text]));
        }
        if let Some(min) = self.min_price {
            domain.push(json!(["list_price", ">=", min]));
        }
        if let Some(max) = self.max_price {
            domain.push(json!(["list_price", "<=", max]));
        }
        if let Some(category) = &self.category {
            domain.push(json!(["categ_id.name", "=", category]));
        }

        domain
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_price(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
