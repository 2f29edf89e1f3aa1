// Application Layer - Use Cases

pub mod cache;
pub mod catalog;
pub mod contact;

// Re-exports
pub use cache::{CacheKey, CacheStore, TtlCache};
pub use catalog::CatalogService;
pub use contact::ContactService;
