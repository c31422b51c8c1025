use crate::ipc::error::ok;
use crate::ipc::helpers::{engine_from_inline, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::info;

fn handle_policy_validate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_from_inline(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let policy = engine.policy();
    ok(
        &req.id,
        json!({
            "valid": true,
            "bandCount": policy.bands().len(),
            "passMark": policy.pass_mark(),
            "minSubjectsToPass": policy.min_subjects_to_pass(),
            "prioritySubjects": policy.priority_subjects(),
            "bands": policy.bands(),
        }),
    )
}

fn handle_policy_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let policy_id = match required_str(req, "policyId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let engine = match engine_from_inline(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let band_count = engine.policy().bands().len();
    let replaced = state.policies.insert(policy_id.clone(), engine).is_some();
    info!(policy_id = %policy_id, band_count, replaced, "policy registered");
    ok(
        &req.id,
        json!({
            "policyId": policy_id,
            "bandCount": band_count,
            "replaced": replaced,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "policy.validate" => Some(handle_policy_validate(state, req)),
        "policy.register" => Some(handle_policy_register(state, req)),
        _ => None,
    }
}
