use std::borrow::Cow;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::warn;

use crate::cohort::{CohortOptions, StudentScores};
use crate::engine::GradingEngine;
use crate::ipc::error::{config_err, err};
use crate::ipc::types::{AppState, Request};
use crate::policy::{decimal_from_json, PolicyConfig};

pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Builds an engine from an inline `params.policy` object.
pub fn engine_from_inline(req: &Request) -> Result<GradingEngine, Value> {
    let Some(raw) = req.params.get("policy") else {
        return Err(err(&req.id, "bad_params", "missing policy", None));
    };
    let config: PolicyConfig = serde_json::from_value(raw.clone()).map_err(|e| {
        warn!(id = %req.id, error = %e, "policy config rejected");
        err(&req.id, "bad_config", format!("invalid policy: {}", e), None)
    })?;
    GradingEngine::from_config(&config).map_err(|e| {
        warn!(id = %req.id, error = %e, "policy config rejected");
        config_err(&req.id, &e)
    })
}

/// Resolves the policy a request grades against: a registered `policyId`
/// when given, otherwise an inline `policy`.
pub fn engine_for<'a>(state: &'a AppState, req: &Request) -> Result<Cow<'a, GradingEngine>, Value> {
    match req.params.get("policyId") {
        None | Some(Value::Null) => engine_from_inline(req).map(Cow::Owned),
        Some(v) => {
            let Some(policy_id) = v.as_str() else {
                return Err(err(&req.id, "bad_params", "policyId must be a string", None));
            };
            state
                .policies
                .get(policy_id)
                .map(Cow::Borrowed)
                .ok_or_else(|| {
                    err(
                        &req.id,
                        "not_found",
                        "policy not registered",
                        Some(json!({ "policyId": policy_id })),
                    )
                })
        }
    }
}

/// Largest score magnitude accepted over the wire. Sums over any realistic
/// cohort stay well inside the `Decimal` range.
const SCORE_LIMIT: i64 = 1_000_000_000_000;

fn parse_score(raw: &Value) -> Result<Decimal, &'static str> {
    let score = decimal_from_json(raw).ok_or("must be numeric")?;
    if score.abs() > Decimal::from(SCORE_LIMIT) {
        return Err("is out of range");
    }
    Ok(score)
}

pub fn score_param(req: &Request, key: &str) -> Result<Decimal, Value> {
    let Some(raw) = req.params.get(key) else {
        return Err(err(&req.id, "bad_params", format!("missing {}", key), None));
    };
    parse_score(raw).map_err(|reason| {
        err(
            &req.id,
            "bad_params",
            format!("{} {}", key, reason),
            Some(json!({ "field": key, "value": raw })),
        )
    })
}

pub fn score_list(req: &Request, key: &str) -> Result<Vec<Decimal>, Value> {
    let Some(items) = req.params.get(key).and_then(|v| v.as_array()) else {
        return Err(err(
            &req.id,
            "bad_params",
            format!("{} must be an array of numbers", key),
            None,
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            parse_score(v).map_err(|reason| {
                err(
                    &req.id,
                    "bad_params",
                    format!("{}[{}] {}", key, i, reason),
                    Some(json!({ "value": v })),
                )
            })
        })
        .collect()
}

/// Parses `{ code: number | null }`. Null marks an absent subject.
pub fn subject_scores(
    req: &Request,
    raw: Option<&Value>,
    path: &str,
) -> Result<BTreeMap<String, Option<Decimal>>, Value> {
    let Some(obj) = raw.and_then(|v| v.as_object()) else {
        return Err(err(
            &req.id,
            "bad_params",
            format!("{} must be an object", path),
            None,
        ));
    };
    let mut out = BTreeMap::new();
    for (code, v) in obj {
        let score = if v.is_null() {
            None
        } else {
            match parse_score(v) {
                Ok(n) => Some(n),
                Err(reason) => {
                    return Err(err(
                        &req.id,
                        "bad_params",
                        format!("{}.{} {}", path, code, reason),
                        Some(json!({ "subjectCode": code, "value": v })),
                    ));
                }
            }
        };
        out.insert(code.clone(), score);
    }
    Ok(out)
}

pub fn students_param(req: &Request) -> Result<Vec<StudentScores>, Value> {
    let Some(items) = req.params.get("students").and_then(|v| v.as_array()) else {
        return Err(err(&req.id, "bad_params", "students must be an array", None));
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(student_id) = item.get("studentId").and_then(|v| v.as_str()) else {
            return Err(err(
                &req.id,
                "bad_params",
                format!("students[{}].studentId must be a string", i),
                None,
            ));
        };
        let path = format!("students[{}].subjectScores", i);
        let subject_scores = subject_scores(req, item.get("subjectScores"), &path)?;
        out.push(StudentScores {
            student_id: student_id.to_string(),
            subject_scores,
        });
    }
    Ok(out)
}

/// `rankPrecision`: omitted keeps the default, null ranks exact averages.
pub fn cohort_options(req: &Request) -> Result<CohortOptions, Value> {
    match req.params.get("rankPrecision") {
        None => Ok(CohortOptions::default()),
        Some(Value::Null) => Ok(CohortOptions {
            rank_precision: None,
        }),
        Some(v) => match v.as_u64() {
            Some(dp) if dp <= 28 => Ok(CohortOptions {
                rank_precision: Some(dp as u32),
            }),
            _ => Err(err(
                &req.id,
                "bad_params",
                "rankPrecision must be an integer between 0 and 28, or null",
                Some(json!({ "rankPrecision": v })),
            )),
        },
    }
}
