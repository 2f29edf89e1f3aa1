// Storefront Infrastructure - Odoo Adapter
// Implements: ErpGateway over JSON-RPC 2.0 (`/web/dataset/call_kw`)

mod client;
mod envelope;

pub use client::{OdooClient, OdooConfig};
pub use envelope::{decode_response, RpcRequest, CALL_KW_PATH};

// Note: reqwest::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<reqwest::Error> for AppError here)
