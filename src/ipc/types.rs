use std::collections::HashMap;

use serde::Deserialize;

use crate::engine::GradingEngine;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Policies the host registered, keyed by the host's own id. Requests always
/// name the policy they grade against.
#[derive(Debug, Default)]
pub struct AppState {
    pub policies: HashMap<String, GradingEngine>,
}
