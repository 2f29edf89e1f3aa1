// ERP Gateway Port (Interface)

use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Keyword arguments of an ERP call (`fields`, `limit`, `order`, ...)
pub type Kwargs = Map<String, Value>;

/// Gateway to the ERP's JSON-RPC `call_kw` surface
///
/// One call per invocation: no retry, no caching.
#[async_trait]
pub trait ErpGateway: Send + Sync {
    /// Invoke `method` on `model` and return the `result` payload
    async fn call(&self, model: &str, method: &str, args: Vec<Value>, kwargs: Kwargs)
        -> Result<Value>;
}

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// A call observed by [`FakeGateway`]
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub model: String,
        pub method: String,
        pub args: Vec<Value>,
        pub kwargs: Kwargs,
    }

    type Responder = Box<dyn Fn(&RecordedCall) -> Result<Value> + Send + Sync>;

    /// Scripted ERP gateway for testing
    pub struct FakeGateway {
        responder: Responder,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeGateway {
        pub fn new(responder: impl Fn(&RecordedCall) -> Result<Value> + Send + Sync + 'static) -> Self {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails with a backend error carrying `message`
        pub fn failing(message: impl Into<String>) -> Self {
            let message = message.into();
            Self::new(move |_| Err(AppError::Backend(message.clone())))
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self, model: &str, method: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.model == model && c.method == method)
                .count()
        }
    }

    #[async_trait]
    impl ErpGateway for FakeGateway {
        async fn call(
            &self,
            model: &str,
            method: &str,
            args: Vec<Value>,
            kwargs: Kwargs,
        ) -> Result<Value> {
            let call = RecordedCall {
                model: model.to_string(),
                method: method.to_string(),
                args,
                kwargs,
            };
            self.calls.lock().unwrap().push(call.clone());
            (self.responder)(&call)
        }
    }
}
