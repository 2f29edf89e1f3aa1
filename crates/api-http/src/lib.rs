//! HTTP API Layer
//!
//! REST surface consumed by the storefront front-end. Every route is a thin
//! translation onto the catalog and contact services.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::AppState;
pub use server::{router, HttpServer, HttpServerConfig, ServerHandle};
