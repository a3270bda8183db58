//! In-memory invoker and locator for testing
//!
//! These mocks allow exercising the extraction flow without AWS access.

use crate::traits::{FunctionInvoker, InvocationResponse, InvokeResult, ObjectLocator};
use async_trait::async_trait;
use bytes::Bytes;
use pdfproc_core::ObjectReference;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock remote function
///
/// Queued outcomes are returned first, in order; afterwards every call gets
/// the fallback outcome.
#[derive(Clone)]
pub struct MockInvoker {
    function_name: String,
    queued: Arc<Mutex<VecDeque<InvokeResult<InvocationResponse>>>>,
    fallback: Arc<Mutex<InvokeResult<InvocationResponse>>>,
    payloads: Arc<Mutex<Vec<Bytes>>>,
}

impl MockInvoker {
    pub fn new(outcome: InvokeResult<InvocationResponse>) -> Self {
        Self {
            function_name: "mock-function".to_string(),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(outcome)),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with an envelope whose `body` is `body` serialized to a string.
    pub fn with_body(body: Value) -> Self {
        Self::new(Ok(envelope(200, &body)))
    }

    pub fn push(&self, outcome: InvokeResult<InvocationResponse>) {
        self.queued.lock().unwrap().push_back(outcome);
    }

    pub fn set_fallback(&self, outcome: InvokeResult<InvocationResponse>) {
        *self.fallback.lock().unwrap() = outcome;
    }

    /// Number of invocations made so far.
    pub fn calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    /// Decoded JSON of the most recent request payload.
    pub fn last_request(&self) -> Option<Value> {
        self.payloads
            .lock()
            .unwrap()
            .last()
            .and_then(|p| serde_json::from_slice(p).ok())
    }
}

/// Successful invoke response wrapping `body` in a `{statusCode, body}` envelope.
pub fn envelope(status_code: i64, body: &Value) -> InvocationResponse {
    let payload = json!({"statusCode": status_code, "body": body.to_string()});
    InvocationResponse::ok(payload.to_string())
}

#[async_trait]
impl FunctionInvoker for MockInvoker {
    async fn invoke(&self, payload: Bytes) -> InvokeResult<InvocationResponse> {
        self.payloads.lock().unwrap().push(payload);
        if let Some(outcome) = self.queued.lock().unwrap().pop_front() {
            return outcome;
        }
        self.fallback.lock().unwrap().clone()
    }

    fn function_name(&self) -> &str {
        &self.function_name
    }
}

/// Mock object locator backed by a set of existing keys
#[derive(Clone)]
pub struct MockLocator {
    bucket: String,
    keys: Arc<Mutex<HashSet<String>>>,
    checks: Arc<Mutex<usize>>,
}

impl MockLocator {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            keys: Arc::new(Mutex::new(HashSet::new())),
            checks: Arc::new(Mutex::new(0)),
        }
    }

    pub fn add_key(&self, key: &str) {
        self.keys.lock().unwrap().insert(key.to_string());
    }

    pub fn checks(&self) -> usize {
        *self.checks.lock().unwrap()
    }
}

#[async_trait]
impl ObjectLocator for MockLocator {
    async fn exists(&self, reference: &ObjectReference) -> InvokeResult<bool> {
        *self.checks.lock().unwrap() += 1;
        Ok(self.keys.lock().unwrap().contains(&reference.key))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
