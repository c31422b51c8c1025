//! Cohort-wide results for report cards and promotion screens.
//!
//! Every student is graded on their own first; only once all averages are
//! known is the cohort ranked, in a single pass through [`crate::ranking`].

use crate::engine::{GradingEngine, OverallResult};
use crate::ranking;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentScores {
    pub student_id: String,
    #[serde(default)]
    pub subject_scores: BTreeMap<String, Option<Decimal>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortOptions {
    /// Decimal places averages are rounded to (midpoint away from zero)
    /// before ranking. `None` ranks exact averages.
    pub rank_precision: Option<u32>,
}

impl Default for CohortOptions {
    fn default() -> Self {
        Self {
            rank_precision: Some(2),
        }
    }
}

impl CohortOptions {
    fn ranking_score(&self, average: Decimal) -> Decimal {
        match self.rank_precision {
            Some(dp) => average.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
            None => average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardRow {
    pub student_id: String,
    pub result: OverallResult,
    /// `None` when the student has no graded subject.
    pub position: Option<u32>,
    pub cohort_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortReport {
    /// One row per input student, in input order.
    pub rows: Vec<ReportCardRow>,
    pub cohort_size: usize,
    pub class_average: Decimal,
    pub pass_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCandidate {
    pub student_id: String,
    pub average_score: Decimal,
    pub meets_pass_criteria: bool,
    pub position: Option<u32>,
}

pub fn evaluate_cohort(
    engine: &GradingEngine,
    students: &[StudentScores],
    options: &CohortOptions,
) -> CohortReport {
    let results: Vec<(&str, OverallResult)> = students
        .iter()
        .map(|s| {
            (
                s.student_id.as_str(),
                engine.calculate_overall_result(&s.subject_scores),
            )
        })
        .collect();

    let mut averages: HashMap<String, Decimal> = HashMap::new();
    for (student_id, result) in &results {
        if result.total_subjects == 0 {
            continue;
        }
        if averages
            .insert(student_id.to_string(), options.ranking_score(result.average_score))
            .is_some()
        {
            warn!(student_id = *student_id, "duplicate student in cohort; last result ranked");
        }
    }
    let ranks = ranking::rank(&averages);
    let cohort_size = ranks.len();

    let ranked_sum = results
        .iter()
        .filter(|(_, r)| r.total_subjects > 0)
        .fold(Decimal::ZERO, |acc, (_, r)| acc.saturating_add(r.average_score));
    let ranked_count = results.iter().filter(|(_, r)| r.total_subjects > 0).count();
    let class_average = if ranked_count > 0 {
        ranked_sum / Decimal::from(ranked_count)
    } else {
        Decimal::ZERO
    };

    let rows: Vec<ReportCardRow> = results
        .into_iter()
        .map(|(student_id, result)| ReportCardRow {
            position: ranks.get(student_id).map(|e| e.rank),
            student_id: student_id.to_string(),
            result,
            cohort_size,
        })
        .collect();
    let pass_count = rows.iter().filter(|r| r.result.meets_pass_criteria).count();

    debug!(
        students = students.len(),
        ranked = cohort_size,
        passed = pass_count,
        "evaluated cohort"
    );

    CohortReport {
        rows,
        cohort_size,
        class_average,
        pass_count,
    }
}

pub fn promotion_preview(
    engine: &GradingEngine,
    students: &[StudentScores],
    options: &CohortOptions,
) -> Vec<PromotionCandidate> {
    evaluate_cohort(engine, students, options)
        .rows
        .into_iter()
        .map(|row| PromotionCandidate {
            student_id: row.student_id,
            average_score: row.result.average_score,
            meets_pass_criteria: row.result.meets_pass_criteria,
            position: row.position,
        })
        .collect()
}
