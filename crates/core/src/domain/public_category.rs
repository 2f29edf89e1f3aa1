// Website (eCommerce) Category Domain Model
//
// Public categories are the ones shown on the shop; a product can sit in
// several of them. Only categories holding published products, directly or
// through descendants, are exposed.

use crate::domain::category::TreeItem;
use crate::domain::record::Many2One;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// ERP model backing website categories
pub const PUBLIC_CATEGORY_MODEL: &str = "product.public.category";

pub const PUBLIC_CATEGORY_FIELDS: &[&str] = &["id", "name", "parent_id", "child_id", "sequence"];

pub const PUBLIC_CATEGORY_ORDER: &str = "sequence asc, name asc";

/// Public category record as returned by `search_read`
#[derive(Debug, Clone, Deserialize)]
pub struct PublicCategoryRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Many2One,
    #[serde(default)]
    pub child_id: Vec<i64>,
    #[serde(default)]
    pub sequence: i64,
}

/// Website-facing public category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCategoryView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub parent_name: Option<String>,
    pub child_ids: Vec<i64>,
    pub sequence: i64,
    /// Published products filed directly under this category
    pub count: i64,
    /// `count` plus the counts of every descendant
    pub total_count: i64,
}

impl PublicCategoryView {
    pub fn project(record: PublicCategoryRecord, count: i64) -> Self {
        Self {
            id: record.id,
            slug: url_slug(&record.name),
            parent_id: record.parent_id.id(),
            parent_name: record.parent_id.label().map(str::to_string),
            child_ids: record.child_id,
            sequence: record.sequence,
            count,
            total_count: count,
            name: record.name,
        }
    }
}

impl TreeItem for PublicCategoryView {
    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
}

/// `"Spa & Hot Tubs"` -> `"spa-hot-tubs"`
///
/// Runs of anything other than ASCII letters and digits collapse to one `-`;
/// no leading or trailing `-`.
pub fn url_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Fill in `total_count`, drop empty branches and order by `sequence`
///
/// Descendants are followed through `child_ids`. Ids that are not in the
/// list contribute nothing.
pub fn roll_up(categories: Vec<PublicCategoryView>) -> Vec<PublicCategoryView> {
    let by_id: HashMap<i64, &PublicCategoryView> =
        categories.iter().map(|c| (c.id, c)).collect();

    let totals: Vec<i64> = categories
        .iter()
        .map(|c| total_count(c.id, &by_id, &mut HashSet::new()))
        .collect();

    let mut kept: Vec<PublicCategoryView> = categories
        .into_iter()
        .zip(totals)
        .filter(|(_, total)| *total > 0)
        .map(|(mut category, total)| {
            category.total_count = total;
            category
        })
        .collect();

    kept.sort_by_key(|c| c.sequence);
    kept
}

fn total_count(
    id: i64,
    by_id: &HashMap<i64, &PublicCategoryView>,
    visited: &mut HashSet<i64>,
) -> i64 {
    if !visited.insert(id) {
        return 0;
    }
    let Some(category) = by_id.get(&id) else {
        return 0;
    };

    category.count
        + category
            .child_ids
            .iter()
            .map(|child| total_count(*child, by_id, visited))
            .sum::<i64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::build_tree;
    use serde_json::json;

    fn view(id: i64, parent: Option<i64>, children: &[i64], sequence: i64, count: i64) -> PublicCategoryView {
        PublicCategoryView {
            id,
            name: format!("Category {}", id),
            slug: format!("category-{}", id),
            parent_id: parent,
            parent_name: None,
            child_ids: children.to_vec(),
            sequence,
            count,
            total_count: count,
        }
    }

    #[test]
    fn test_url_slug() {
        assert_eq!(url_slug("Spa & Hot Tubs"), "spa-hot-tubs");
        assert_eq!(url_slug("  Pool Filters "), "pool-filters");
        assert_eq!(url_slug("LED Lights (12V)"), "led-lights-12v");
        assert_eq!(url_slug("***"), "");
    }

    #[test]
    fn test_project_record() {
        let record: PublicCategoryRecord = serde_json::from_value(json!({
            "id": 8, "name": "Sand Filters", "parent_id": [3, "Filters"],
            "child_id": [12, 13], "sequence": 4
        }))
        .unwrap();
        let view = PublicCategoryView::project(record, 6);

        assert_eq!(view.parent_id, Some(3));
        assert_eq!(view.parent_name.as_deref(), Some("Filters"));
        assert_eq!(view.child_ids, vec![12, 13]);
        assert_eq!(view.total_count, 6);

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["parentName"], "Filters");
        assert_eq!(value["childIds"], json!([12, 13]));
        assert_eq!(value["totalCount"], 6);
    }

    #[test]
    fn test_project_root_record() {
        let record: PublicCategoryRecord =
            serde_json::from_value(json!({"id": 1, "name": "Shop", "parent_id": false, "child_id": []}))
                .unwrap();
        let view = PublicCategoryView::project(record, 0);

        assert_eq!(view.parent_id, None);
        assert_eq!(view.parent_name, None);
        assert_eq!(view.sequence, 0);
    }

    #[test]
    fn test_roll_up_keeps_parents_of_stocked_children() {
        let rolled = roll_up(vec![
            view(1, None, &[2, 3], 10, 0),
            view(2, Some(1), &[], 5, 4),
            view(3, Some(1), &[], 1, 0),
            view(4, None, &[], 2, 1),
        ]);

        let ids: Vec<i64> = rolled.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
        assert_eq!(rolled[2].total_count, 4);
        assert_eq!(rolled[2].count, 0);
    }

    #[test]
    fn test_roll_up_survives_child_cycles() {
        let rolled = roll_up(vec![view(1, None, &[2], 1, 1), view(2, Some(1), &[1], 2, 1)]);

        assert_eq!(rolled[0].total_count, 2);
        assert_eq!(rolled[1].total_count, 2);
    }

    #[test]
    fn test_tree_follows_sequence() {
        let rolled = roll_up(vec![
            view(1, None, &[2, 3], 1, 0),
            view(2, Some(1), &[], 9, 1),
            view(3, Some(1), &[], 3, 1),
        ]);
        let tree = build_tree(&rolled);

        assert_eq!(tree.len(), 1);
        let child_ids: Vec<i64> = tree[0].children.iter().map(|c| c.category.id).collect();
        assert_eq!(child_ids, vec![3, 2]);
    }
}
