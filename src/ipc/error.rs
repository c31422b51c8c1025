use serde::Serialize;
use serde_json::json;

use crate::error::ConfigurationError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn config_err(id: &str, e: &ConfigurationError) -> serde_json::Value {
    err(id, e.code(), e.to_string(), None)
}

/// Serializes a result model into an `ok` response.
pub fn ok_model<T: Serialize>(id: &str, model: &T) -> serde_json::Value {
    match serde_json::to_value(model) {
        Ok(v) => ok(id, v),
        Err(e) => err(id, "internal", e.to_string(), None),
    }
}
