use crate::error::ConfigurationError;
use crate::scale::{GradeBand, GradeScale};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

/// Grading configuration as supplied by the school's settings, before
/// validation. Thresholds stay as raw JSON until [`GradingPolicy::from_config`]
/// checks them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    pub min_score: Option<Value>,
    pub max_score: Option<Value>,
    pub pass_mark: Option<Value>,
    pub min_subjects_to_pass: Option<Value>,
    #[serde(default)]
    pub priority_subjects: Vec<String>,
    #[serde(default)]
    pub bands: Vec<BandConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandConfig {
    pub grade: Option<String>,
    pub min_score: Option<Value>,
    pub max_score: Option<Value>,
    pub gpa_points: Option<Value>,
    pub points: Option<Value>,
    pub is_passing: Option<bool>,
    pub sort_order: Option<Value>,
}

/// Pass rules applied on top of a grade scale.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySettings {
    pub min_score: Decimal,
    pub max_score: Decimal,
    pub pass_mark: Decimal,
    pub min_subjects_to_pass: i64,
    pub priority_subjects: BTreeSet<String>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            min_score: Decimal::ZERO,
            max_score: Decimal::ONE_HUNDRED,
            pass_mark: Decimal::from(50),
            min_subjects_to_pass: 0,
            priority_subjects: BTreeSet::new(),
        }
    }
}

/// Validated, immutable grading configuration for one school or level.
///
/// The only ways to obtain one are [`GradingPolicy::new`] and
/// [`GradingPolicy::from_config`], both of which reject malformed input, so
/// anything holding a `GradingPolicy` can grade without further checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingPolicy {
    min_score: Decimal,
    max_score: Decimal,
    pass_mark: Decimal,
    min_subjects_to_pass: u32,
    priority_subjects: BTreeSet<String>,
    scale: GradeScale,
}

impl GradingPolicy {
    pub fn new(
        settings: PolicySettings,
        bands: Vec<GradeBand>,
    ) -> Result<Self, ConfigurationError> {
        if bands.is_empty() {
            return Err(ConfigurationError::NoBands);
        }
        if settings.min_subjects_to_pass < 0 {
            return Err(ConfigurationError::NegativeMinSubjects {
                value: settings.min_subjects_to_pass,
            });
        }
        let min_subjects_to_pass = u32::try_from(settings.min_subjects_to_pass).map_err(|_| {
            ConfigurationError::NonInteger {
                field: "minSubjectsToPass".to_string(),
                value: settings.min_subjects_to_pass.to_string(),
            }
        })?;
        if settings.min_score > settings.max_score {
            return Err(ConfigurationError::InvertedDomain {
                min: settings.min_score,
                max: settings.max_score,
            });
        }

        let bands: Vec<GradeBand> = bands
            .into_iter()
            .map(|band| GradeBand {
                grade: band.grade.trim().to_string(),
                ..band
            })
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        for (index, band) in bands.iter().enumerate() {
            let grade = band.grade.as_str();
            if grade.is_empty() {
                return Err(ConfigurationError::BlankGrade { index });
            }
            if band.min_score > band.max_score {
                return Err(ConfigurationError::InvertedBand {
                    index,
                    grade: grade.to_string(),
                    min: band.min_score,
                    max: band.max_score,
                });
            }
            if !seen.insert(grade) {
                return Err(ConfigurationError::DuplicateGrade {
                    grade: grade.to_string(),
                });
            }
        }

        let priority_subjects = settings
            .priority_subjects
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            min_score: settings.min_score,
            max_score: settings.max_score,
            pass_mark: settings.pass_mark,
            min_subjects_to_pass,
            priority_subjects,
            scale: GradeScale::new(bands),
        })
    }

    /// Validates raw configuration into a policy.
    ///
    /// Defaults: `minScore` 0, `maxScore` 100, `minSubjectsToPass` 0, and a
    /// `passMark` equal to the lowest passing band's `minScore` (or the
    /// policy's `minScore` when no band passes). A band without `sortOrder`
    /// takes its position in the list.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigurationError> {
        if config.bands.is_empty() {
            return Err(ConfigurationError::NoBands);
        }

        let mut bands = Vec::with_capacity(config.bands.len());
        for (index, raw) in config.bands.iter().enumerate() {
            bands.push(parse_band(index, raw)?);
        }

        let min_score =
            optional_decimal("minScore", config.min_score.as_ref())?.unwrap_or(Decimal::ZERO);
        let max_score = optional_decimal("maxScore", config.max_score.as_ref())?
            .unwrap_or(Decimal::ONE_HUNDRED);
        let pass_mark = match optional_decimal("passMark", config.pass_mark.as_ref())? {
            Some(v) => v,
            None => bands
                .iter()
                .filter(|b| b.is_passing)
                .map(|b| b.min_score)
                .min()
                .unwrap_or(min_score),
        };
        let min_subjects_to_pass =
            optional_integer("minSubjectsToPass", config.min_subjects_to_pass.as_ref())?
                .unwrap_or(0);

        Self::new(
            PolicySettings {
                min_score,
                max_score,
                pass_mark,
                min_subjects_to_pass,
                priority_subjects: config.priority_subjects.iter().cloned().collect(),
            },
            bands,
        )
    }

    pub fn min_score(&self) -> Decimal {
        self.min_score
    }

    pub fn max_score(&self) -> Decimal {
        self.max_score
    }

    /// Display-only threshold; per-subject decisions come from the band flag.
    pub fn pass_mark(&self) -> Decimal {
        self.pass_mark
    }

    pub fn min_subjects_to_pass(&self) -> u32 {
        self.min_subjects_to_pass
    }

    pub fn priority_subjects(&self) -> &BTreeSet<String> {
        &self.priority_subjects
    }

    /// Codes are compared trimmed, matching how priority codes are stored.
    pub fn is_priority_subject(&self, subject_code: &str) -> bool {
        self.priority_subjects.contains(subject_code.trim())
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn bands(&self) -> &[GradeBand] {
        self.scale.bands()
    }
}

fn parse_band(index: usize, raw: &BandConfig) -> Result<GradeBand, ConfigurationError> {
    let field = |name: &str| format!("bands[{}].{}", index, name);

    let grade = raw
        .grade
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| ConfigurationError::missing(field("grade")))?;
    if grade.is_empty() {
        return Err(ConfigurationError::BlankGrade { index });
    }
    let min_score = required_decimal(&field("minScore"), raw.min_score.as_ref())?;
    let max_score = required_decimal(&field("maxScore"), raw.max_score.as_ref())?;
    let gpa_points = optional_decimal(&field("gpaPoints"), raw.gpa_points.as_ref())?;
    let points = optional_integer(&field("points"), raw.points.as_ref())?;
    let is_passing = raw
        .is_passing
        .ok_or_else(|| ConfigurationError::missing(field("isPassing")))?;
    let sort_order =
        optional_integer(&field("sortOrder"), raw.sort_order.as_ref())?.unwrap_or(index as i64);

    Ok(GradeBand {
        grade: grade.to_string(),
        min_score,
        max_score,
        gpa_points,
        points,
        is_passing,
        sort_order,
    })
}

/// Reads a JSON number or numeric string as an exact decimal.
pub fn decimal_from_json(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn required_decimal(field: &str, raw: Option<&Value>) -> Result<Decimal, ConfigurationError> {
    optional_decimal(field, raw)?.ok_or_else(|| ConfigurationError::missing(field))
}

fn optional_decimal(field: &str, raw: Option<&Value>) -> Result<Option<Decimal>, ConfigurationError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(v) => decimal_from_json(v)
            .map(Some)
            .ok_or_else(|| ConfigurationError::non_numeric(field, v)),
    }
}

fn optional_integer(field: &str, raw: Option<&Value>) -> Result<Option<i64>, ConfigurationError> {
    let Some(value) = optional_decimal(field, raw)? else {
        return Ok(None);
    };
    if !value.fract().is_zero() {
        return Err(ConfigurationError::NonInteger {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    value
        .to_i64()
        .map(Some)
        .ok_or_else(|| ConfigurationError::NonInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}
