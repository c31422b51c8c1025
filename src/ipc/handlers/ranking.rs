use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::policy::decimal_from_json;
use crate::ranking;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;

fn handle_ranking_rank(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(obj) = req.params.get("scores").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "scores must be an object", None);
    };
    let mut scores: HashMap<String, Decimal> = HashMap::with_capacity(obj.len());
    for (entity_id, v) in obj {
        let Some(score) = decimal_from_json(v) else {
            return err(
                &req.id,
                "bad_params",
                format!("scores.{} must be numeric", entity_id),
                Some(json!({ "entityId": entity_id, "value": v })),
            );
        };
        scores.insert(entity_id.clone(), score);
    }
    ok(
        &req.id,
        json!({ "ranks": ranking::rank_ordered(&scores) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ranking.rank" => Some(handle_ranking_rank(state, req)),
        _ => None,
    }
}
