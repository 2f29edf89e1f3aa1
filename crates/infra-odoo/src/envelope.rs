// JSON-RPC 2.0 envelope for Odoo's `call_kw`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::error::{AppError, Result};
use storefront_core::port::Kwargs;

/// Path of the JSON-RPC endpoint, relative to the ERP base URL
pub const CALL_KW_PATH: &str = "/web/dataset/call_kw";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: CallParams<'a>,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct CallParams<'a> {
    pub model: &'a str,
    pub method: &'a str,
    pub args: Vec<Value>,
    pub kwargs: Kwargs,
}

impl<'a> RpcRequest<'a> {
    pub fn call(model: &'a str, method: &'a str, args: Vec<Value>, kwargs: Kwargs, id: i64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params: CallParams {
                model,
                method,
                args,
                kwargs,
            },
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Decode a raw response body into its `result`
///
/// A body that is not JSON is a transport failure; an `error` member is a
/// backend failure carrying the most specific message the ERP supplied.
pub fn decode_response(body: &str) -> Result<Value> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Transport(format!("Invalid JSON response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(AppError::Backend(error_message(&error)));
    }

    Ok(response.result.unwrap_or(Value::Null))
}

fn error_message(error: &Value) -> String {
    error
        .pointer("/data/message")
        .and_then(Value::as_str)
        .or_else(|| error.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_shape() {
        let mut kwargs = Kwargs::new();
        kwargs.insert("limit".into(), json!(100));

        let request = RpcRequest::call(
            "product.template",
            "search_read",
            vec![json!([["name", "ilike", "pump"]])],
            kwargs,
            1_700_000_000_123,
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": {
                    "model": "product.template",
                    "method": "search_read",
                    "args": [[["name", "ilike", "pump"]]],
                    "kwargs": {"limit": 100}
                },
                "id": 1_700_000_000_123_i64
            })
        );
    }

    #[test]
    fn test_decode_result() {
        let value = decode_response(r#"{"jsonrpc":"2.0","id":1,"result":[{"id":3}]}"#).unwrap();
        assert_eq!(value, json!([{"id": 3}]));
    }

    #[test]
    fn test_decode_missing_result_is_null() {
        let value = decode_response(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_decode_prefers_data_message() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": 200,
                "message": "Odoo Server Error",
                "data": {"name": "odoo.exceptions.AccessError", "message": "You are not allowed to access 'Lead'"}
            }
        })
        .to_string();

        match decode_response(&body) {
            Err(AppError::Backend(msg)) => assert_eq!(msg, "You are not allowed to access 'Lead'"),
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_falls_back_to_message_then_raw() {
        let body = r#"{"error":{"code":-32601,"message":"Method not found"}}"#;
        assert!(matches!(decode_response(body), Err(AppError::Backend(m)) if m == "Method not found"));

        let body = r#"{"error":{"code":42}}"#;
        assert!(matches!(decode_response(body), Err(AppError::Backend(m)) if m.contains("42")));
    }

    #[test]
    fn test_decode_non_json_is_transport_error() {
        let err = decode_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
