//! In-process fake ERP for end-to-end tests
//!
//! Serves `POST /web/dataset/call_kw` on an ephemeral localhost port and
//! records every request it receives.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the fake ERP answers to one call
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{"result": ...}`
    Result(Value),
    /// `{"error": ...}`
    Error(Value),
    /// Non-JSON body with the given status
    Raw(StatusCode, &'static str),
}

/// A request as received by the fake ERP
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

impl CapturedRequest {
    pub fn model(&self) -> &str {
        self.body["params"]["model"].as_str().unwrap_or_default()
    }

    pub fn method(&self) -> &str {
        self.body["params"]["method"].as_str().unwrap_or_default()
    }
}

type Script = Arc<dyn Fn(&str, &str, &Value) -> Reply + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    script: Script,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct FakeErp {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl FakeErp {
    /// `script(model, method, params)` decides the reply to each call
    pub async fn start(script: impl Fn(&str, &str, &Value) -> Reply + Send + Sync + 'static) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            script: Arc::new(script),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/web/dataset/call_kw", post(call_kw))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, model: &str, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.model() == model && r.method() == method)
            .count()
    }
}

impl Drop for FakeErp {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn call_kw(State(state): State<FakeState>, headers: HeaderMap, body: String) -> Response {
    let body: Value = match serde_json::from_str(&body) {
        Ok(body) => body,
        Err(_) => return (StatusCode::BAD_REQUEST, "not json").into_response(),
    };

    let captured = CapturedRequest {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    };
    state.requests.lock().unwrap().push(captured.clone());

    let reply = (state.script)(captured.model(), captured.method(), &body["params"]);
    let id = body["id"].clone();

    match reply {
        Reply::Result(result) => {
            axum::Json(json!({"jsonrpc": "2.0", "id": id, "result": result})).into_response()
        }
        Reply::Error(error) => {
            axum::Json(json!({"jsonrpc": "2.0", "id": id, "error": error})).into_response()
        }
        Reply::Raw(status, text) => (status, text).into_response(),
    }
}

/// Base URL of a localhost port with nothing listening
///
/// The listener is closed synchronously before returning, so connections
/// are refused rather than accepted by a task that is still shutting down.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Canned catalog used by most tests
pub fn catalog_script(model: &str, method: &str, params: &Value) -> Reply {
    match (model, method) {
        ("product.template", "search_read") => {
            if params["args"][0] == json!([["id", "=", 999]]) {
                return Reply::Result(json!([]));
            }
            Reply::Result(json!([
                {"id": 10, "name": "Cartridge Filter", "list_price": 79.0,
                 "categ_id": [2, "Pool Filters"], "image_1920": false,
                 "description_sale": false, "default_code": "CF-10"},
                {"id": 11, "name": "Test Kit", "list_price": 12.5,
                 "categ_id": false, "image_1920": false,
                 "description_sale": "Chlorine and pH", "default_code": false}
            ]))
        }
        ("product.template", "search_count") => Reply::Result(json!(4)),
        ("product.category", "search_read") => Reply::Result(json!([
            {"id": 1, "name": "All", "parent_id": false},
            {"id": 2, "name": "Pool Filters", "parent_id": [1, "All"]}
        ])),
        ("product.public.category", "search_read") => Reply::Result(json!([
            {"id": 4, "name": "Pool Care", "parent_id": false, "child_id": [5], "sequence": 1},
            {"id": 5, "name": "Chemicals", "parent_id": [4, "Pool Care"], "child_id": [], "sequence": 2}
        ])),
        ("product.ribbon", "search_read") => Reply::Result(json!([
            {"id": 1, "name": "Sale", "html": "Sale", "bg_color": "#e00", "text_color": "#fff"}
        ])),
        ("crm.lead", "create") => Reply::Result(json!(501)),
        _ => Reply::Error(json!({"code": 200, "message": "Odoo Server Error"})),
    }
}
