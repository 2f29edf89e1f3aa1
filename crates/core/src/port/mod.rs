// Port Layer - Interfaces for external dependencies

pub mod erp_gateway;
pub mod time_provider;

// Re-exports
pub use erp_gateway::{ErpGateway, Kwargs};
pub use time_provider::{SystemTimeProvider, TimeProvider};
