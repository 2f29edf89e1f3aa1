// Category Domain Model

use crate::domain::record::Many2One;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// ERP model backing categories
pub const CATEGORY_MODEL: &str = "product.category";

pub const CATEGORY_FIELDS: &[&str] = &["id", "name", "parent_id"];

/// Static image shown for every category
pub const CATEGORY_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1552321554-5fefe8c9ef14?w=600&h=400&fit=crop";

/// Category record as returned by `search_read`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Many2One,
}

/// Website-facing category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub count: i64,
    pub image: String,
}

impl CategoryView {
    /// `count` is the number of products filed under the category
    pub fn project(record: CategoryRecord, count: i64) -> Self {
        Self {
            id: record.id,
            slug: slugify(&record.name),
            parent_id: record.parent_id.id(),
            count,
            image: CATEGORY_PLACEHOLDER_IMAGE.to_string(),
            name: record.name,
        }
    }
}

/// `"Pool Filters"` -> `"pool-filters"`
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Anything that can be nested by a parent id
pub trait TreeItem: Clone {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
}

impl TreeItem for CategoryView {
    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
}

/// Category with its nested subcategories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryNode<C = CategoryView> {
    #[serde(flatten)]
    pub category: C,
    pub children: Vec<CategoryNode<C>>,
}

/// Nest categories by `parent_id`, keeping input order among siblings
///
/// A category whose parent is not in the list is treated as a root.
pub fn build_tree<C: TreeItem>(categories: &[C]) -> Vec<CategoryNode<C>> {
    let known: HashSet<i64> = categories.iter().map(|c| c.id()).collect();
    let mut children: HashMap<i64, Vec<&C>> = HashMap::new();
    let mut roots = Vec::new();

    for category in categories {
        match category.parent_id() {
            Some(parent) if known.contains(&parent) && parent != category.id() => {
                children.entry(parent).or_default().push(category)
            }
            _ => roots.push(category),
        }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &children))
        .collect()
}

fn attach<C: TreeItem>(category: &C, children: &HashMap<i64, Vec<&C>>) -> CategoryNode<C> {
    let nested = children
        .get(&category.id())
        .map(|kids| kids.iter().map(|kid| attach(*kid, children)).collect())
        .unwrap_or_default();

    CategoryNode {
        category: category.clone(),
        children: nested,
    }
}
