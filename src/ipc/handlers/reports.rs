use crate::cohort;
use crate::ipc::error::{ok, ok_model};
use crate::ipc::helpers::{cohort_options, engine_for, students_param};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_reports_cohort(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = match students_param(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let options = match cohort_options(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok_model(
        &req.id,
        &cohort::evaluate_cohort(&engine, &students, &options),
    )
}

fn handle_promotion_preview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = match students_param(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let options = match cohort_options(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let candidates = cohort::promotion_preview(&engine, &students, &options);
    ok(&req.id, json!({ "candidates": candidates }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.cohort" => Some(handle_reports_cohort(state, req)),
        "promotion.preview" => Some(handle_promotion_preview(state, req)),
        _ => None,
    }
}
