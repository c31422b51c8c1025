use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut registered: Vec<&str> = state.policies.keys().map(|k| k.as_str()).collect();
    registered.sort_unstable();
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "registeredPolicies": registered,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
