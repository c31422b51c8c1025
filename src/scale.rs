use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// One row of a grade scale: an inclusive score range mapped to a grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBand {
    pub grade: String,
    pub min_score: Decimal,
    pub max_score: Decimal,
    pub gpa_points: Option<Decimal>,
    pub points: Option<i64>,
    pub is_passing: bool,
    pub sort_order: i64,
}

impl GradeBand {
    pub fn contains(&self, score: Decimal) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

// Ascending sort_order, then ascending min_score. Sorting is stable, so
// bands equal on both keys keep their input order.
fn evaluation_order(a: &GradeBand, b: &GradeBand) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.min_score.cmp(&b.min_score))
}

/// Finds the band a score falls into.
///
/// `bands` may be empty, unsorted or overlapping. They are evaluated in
/// `sort_order` order (ties broken by `min_score`) and the first band whose
/// inclusive range contains `score` wins. `None` means the score is ungraded,
/// which callers must not treat as a failing grade.
pub fn resolve_band(bands: &[GradeBand], score: Decimal) -> Option<&GradeBand> {
    let mut ordered: Vec<&GradeBand> = bands.iter().collect();
    ordered.sort_by(|a, b| evaluation_order(a, b));
    ordered.into_iter().find(|b| b.contains(score))
}

/// A band list held in evaluation order, so repeated lookups skip the sort.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
}

impl GradeScale {
    pub fn new(mut bands: Vec<GradeBand>) -> Self {
        bands.sort_by(evaluation_order);
        Self { bands }
    }

    /// Same result as [`resolve_band`] over the bands this scale was built from.
    pub fn resolve(&self, score: Decimal) -> Option<&GradeBand> {
        self.bands.iter().find(|b| b.contains(score))
    }

    /// Bands in evaluation order.
    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Lowest `min_score` among passing bands.
    pub fn lowest_passing_score(&self) -> Option<Decimal> {
        self.bands
            .iter()
            .filter(|b| b.is_passing)
            .map(|b| b.min_score)
            .min()
    }
}
