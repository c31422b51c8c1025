use crate::error::ConfigurationError;
use crate::policy::{GradingPolicy, PolicyConfig};
use crate::scale::GradeBand;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    pub subject_code: String,
    pub score: Decimal,
    pub grade: Option<String>,
    pub is_passing: bool,
    pub gpa_points: Option<Decimal>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    /// Graded subjects, ordered by subject code.
    pub subjects: Vec<SubjectResult>,
    pub total_subjects: usize,
    pub subjects_passed: usize,
    pub average_score: Decimal,
    pub overall_grade: Option<String>,
    pub meets_pass_criteria: bool,
    pub gpa: Decimal,
    pub total_points: Option<i64>,
}

/// Grades scores against one policy.
///
/// Holds nothing but the immutable policy, so a single engine can be shared
/// across threads and every method is a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct GradingEngine {
    policy: GradingPolicy,
}

impl GradingEngine {
    pub fn new(policy: GradingPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigurationError> {
        GradingPolicy::from_config(config).map(Self::new)
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    /// Band for `score`, or `None` when no band contains it.
    ///
    /// Scores outside the policy's declared `[min_score, max_score]` are still
    /// looked up: the domain is advisory and bands decide.
    pub fn calculate_grade(&self, score: Decimal) -> Option<&GradeBand> {
        self.policy.scale().resolve(score)
    }

    /// An ungraded score counts as failing.
    pub fn is_passing(&self, score: Decimal) -> bool {
        self.calculate_grade(score)
            .map(|b| b.is_passing)
            .unwrap_or(false)
    }

    /// Same decision as [`is_passing`](Self::is_passing). Priority subjects
    /// only matter when results are aggregated.
    pub fn is_subject_passing(&self, _subject_code: &str, score: Decimal) -> bool {
        self.is_passing(score)
    }

    /// Compares against the policy pass mark. For display and ranking
    /// screens only; subject pass/fail always comes from the band.
    pub fn meets_pass_mark(&self, score: Decimal) -> bool {
        score >= self.policy.pass_mark()
    }

    pub fn grade_subject(&self, subject_code: &str, score: Decimal) -> SubjectResult {
        let band = self.calculate_grade(score);
        SubjectResult {
            subject_code: subject_code.to_string(),
            score,
            grade: band.map(|b| b.grade.clone()),
            is_passing: self.is_subject_passing(subject_code, score),
            gpa_points: band.and_then(|b| b.gpa_points),
            points: band.and_then(|b| b.points),
        }
    }

    /// Mean GPA points of the scores that resolve to a band carrying points.
    /// Returns zero when none do.
    pub fn calculate_gpa<I>(&self, scores: I) -> Decimal
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut sum = Decimal::ZERO;
        let mut count: u32 = 0;
        for score in scores {
            if let Some(points) = self.calculate_grade(score).and_then(|b| b.gpa_points) {
                sum = sum.saturating_add(points);
                count += 1;
            }
        }
        if count > 0 {
            sum / Decimal::from(count)
        } else {
            Decimal::ZERO
        }
    }

    /// Sum of band points over resolved scores; `None` if no resolved band
    /// carries points. Saturates at the `i64` bounds.
    pub fn calculate_total_points<I>(&self, scores: I) -> Option<i64>
    where
        I: IntoIterator<Item = Decimal>,
    {
        scores
            .into_iter()
            .filter_map(|s| self.calculate_grade(s).and_then(|b| b.points))
            .fold(None, |acc, p| Some(acc.unwrap_or(0).saturating_add(p)))
    }

    /// Aggregates one student's subject scores.
    ///
    /// Absent (`None`) scores are left out entirely. The average is the plain
    /// unweighted mean of the present scores, zero when there are none; the
    /// sum saturates at the `Decimal` bounds. The overall grade is the band of
    /// that average, so an empty map is graded at zero.
    /// Pass criteria: at least `min_subjects_to_pass` subjects pass, and no
    /// attempted priority subject fails.
    pub fn calculate_overall_result<'a, I>(&self, subject_scores: I) -> OverallResult
    where
        I: IntoIterator<Item = (&'a String, &'a Option<Decimal>)>,
    {
        let mut subjects: Vec<SubjectResult> = subject_scores
            .into_iter()
            .filter_map(|(code, score)| score.map(|s| self.grade_subject(code, s)))
            .collect();
        subjects.sort_by(|a, b| a.subject_code.cmp(&b.subject_code));

        let total_subjects = subjects.len();
        let subjects_passed = subjects.iter().filter(|s| s.is_passing).count();

        let average_score = if total_subjects > 0 {
            let sum = subjects
                .iter()
                .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.score));
            sum / Decimal::from(total_subjects)
        } else {
            Decimal::ZERO
        };
        let overall_grade = self
            .calculate_grade(average_score)
            .map(|b| b.grade.clone());

        let meets_count = subjects_passed >= self.policy.min_subjects_to_pass() as usize;
        let priority_failed = subjects
            .iter()
            .any(|s| self.policy.is_priority_subject(&s.subject_code) && !s.is_passing);
        let meets_pass_criteria = meets_count && !priority_failed;

        let gpa = self.calculate_gpa(subjects.iter().map(|s| s.score));
        let total_points = self.calculate_total_points(subjects.iter().map(|s| s.score));

        OverallResult {
            subjects,
            total_subjects,
            subjects_passed,
            average_score,
            overall_grade,
            meets_pass_criteria,
            gpa,
            total_points,
        }
    }
}
