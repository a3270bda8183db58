//! Remote function request/response contract
//!
//! Request: `{"file_name": "<key>"}`, plus `"bucket"` when the reference names
//! one explicitly.
//!
//! Response: the invoke API must report status 200 without a function error.
//! The payload is normally an API-gateway style envelope
//! `{"statusCode": 200, "body": "<json string>"}`; `body` may also be a
//! structured value. A payload with neither `body` nor `statusCode` is taken
//! as the body itself. An envelope status of 400 or more is a failure, 404
//! meaning the object does not exist.

use bytes::Bytes;
use pdfproc_core::ObjectReference;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::traits::{InvocationResponse, InvokeError, InvokeResult};

const SUCCESS_STATUS: i32 = 200;
const UNKNOWN_ERROR: &str = "Unknown error";

/// Lowercase fragments of S3 "missing key" errors surfaced by the remote function.
const MISSING_OBJECT_MARKERS: &[&str] = &[
    "nosuchkey",
    "no such key",
    "specified key does not exist",
];

#[derive(Debug, Serialize)]
struct ExtractionRequest<'a> {
    file_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket: Option<&'a str>,
}

/// Encode the request payload for `reference`.
pub fn encode_request(reference: &ObjectReference) -> InvokeResult<Bytes> {
    let request = ExtractionRequest {
        file_name: reference.file_name(),
        bucket: reference.bucket.as_deref(),
    };
    serde_json::to_vec(&request)
        .map(Bytes::from)
        .map_err(|e| InvokeError::Transport(format!("Failed to encode request payload: {}", e)))
}

/// Decode an invocation response into the result body.
pub fn decode_response(
    reference: &ObjectReference,
    response: &InvocationResponse,
) -> InvokeResult<Value> {
    let payload = parse_payload(&response.payload)?;

    if response.status_code != SUCCESS_STATUS {
        let message = error_message(&payload).unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return Err(classify_failure(reference, response.status_code, message));
    }

    if let Some(kind) = &response.function_error {
        let message = error_message(&payload).unwrap_or_else(|| kind.clone());
        return Err(classify_failure(reference, response.status_code, message));
    }

    extract_body(reference, payload)
}

fn parse_payload(payload: &Bytes) -> InvokeResult<Value> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(payload).map_err(|e| {
        InvokeError::MalformedResponse(format!("payload is not valid JSON: {}", e))
    })
}

/// `errorType: errorMessage` from a function error payload.
fn error_message(payload: &Value) -> Option<String> {
    let message = payload.get("errorMessage").and_then(Value::as_str);
    let kind = payload.get("errorType").and_then(Value::as_str);
    match (kind, message) {
        (Some(kind), Some(message)) => Some(format!("{}: {}", kind, message)),
        (None, Some(message)) => Some(message.to_string()),
        (Some(kind), None) => Some(kind.to_string()),
        (None, None) => None,
    }
}

fn looks_like_missing_object(message: &str) -> bool {
    let message = message.to_lowercase();
    MISSING_OBJECT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn classify_failure(reference: &ObjectReference, status_code: i32, message: String) -> InvokeError {
    if status_code == 404 || looks_like_missing_object(&message) {
        InvokeError::ObjectNotFound(format!("{} ({})", reference, message))
    } else {
        InvokeError::Remote {
            status_code,
            message,
        }
    }
}

fn status_code_of(envelope: &Map<String, Value>) -> Option<i64> {
    match envelope.get("statusCode")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Best-effort message from an envelope body of a failed call.
fn body_error_message(body: Option<&Value>) -> String {
    fn lookup(value: &Value) -> Option<String> {
        ["errorMessage", "error", "message"]
            .iter()
            .find_map(|field| value.get(field).and_then(Value::as_str))
            .map(str::to_string)
    }

    match body {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|parsed| lookup(&parsed))
            .unwrap_or_else(|| text.clone()),
        Some(value) => lookup(value).unwrap_or_else(|| value.to_string()),
        None => UNKNOWN_ERROR.to_string(),
    }
}

fn parse_body_text(text: &str) -> InvokeResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text)
        .map_err(|e| InvokeError::MalformedResponse(format!("body is not valid JSON: {}", e)))
}

fn extract_body(reference: &ObjectReference, payload: Value) -> InvokeResult<Value> {
    let mut envelope = match payload {
        Value::Object(envelope) => envelope,
        other => return Ok(other),
    };

    let status = status_code_of(&envelope);
    if let Some(status) = status {
        if status >= 400 {
            let message = body_error_message(envelope.get("body"));
            let status_code = i32::try_from(status).unwrap_or(i32::MAX);
            return Err(classify_failure(reference, status_code, message));
        }
    }

    match envelope.remove("body") {
        Some(Value::String(text)) => parse_body_text(&text),
        Some(body) => Ok(body),
        None if status.is_some() => Ok(Value::Object(Map::new())),
        None => Ok(Value::Object(envelope)),
    }
}
