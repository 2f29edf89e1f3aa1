// Domain Layer - ERP records and their website projections

pub mod category;
pub mod lead;
pub mod product;
pub mod public_category;
pub mod record;
pub mod search;

/// ERP model for product ribbons ("Sale", "New!")
pub const RIBBON_MODEL: &str = "product.ribbon";

pub const RIBBON_FIELDS: &[&str] = &["id", "name", "html", "bg_color", "text_color"];

// Re-exports
pub use category::{build_tree, slugify, CategoryNode, CategoryRecord, CategoryView, TreeItem};
pub use lead::{ContactForm, LeadRecord};
pub use product::{product_id_from_slug, product_slug, ProductRecord, ProductView};
pub use public_category::{roll_up, url_slug, PublicCategoryRecord, PublicCategoryView};
pub use record::Many2One;
pub use search::{SearchCriteria, SortOrder};
