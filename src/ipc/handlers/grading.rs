use crate::ipc::error::{ok, ok_model};
use crate::ipc::helpers::{engine_for, score_list, score_param, subject_scores};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_grade_resolve(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let score = match score_param(req, "score") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subject_code = req
        .params
        .get("subjectCode")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    ok_model(&req.id, &engine.grade_subject(subject_code, score))
}

fn handle_grade_gpa(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores = match score_list(req, "scores") {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "gpa": engine.calculate_gpa(scores.iter().copied()),
            "totalPoints": engine.calculate_total_points(scores.iter().copied()),
        }),
    )
}

fn handle_results_overall(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine_for(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores = match subject_scores(req, req.params.get("subjectScores"), "subjectScores") {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok_model(&req.id, &engine.calculate_overall_result(&scores))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grade.resolve" => Some(handle_grade_resolve(state, req)),
        "grade.gpa" => Some(handle_grade_gpa(state, req)),
        "results.overall" => Some(handle_results_overall(state, req)),
        _ => None,
    }
}
