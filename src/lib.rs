//! Grade and result computation for school report cards.
//!
//! A [`GradingPolicy`] is validated once from school configuration, a
//! [`GradingEngine`] grades individual students against it, and
//! [`ranking`] assigns competition ranks across a cohort.

pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod ipc;
pub mod policy;
pub mod ranking;
pub mod scale;
pub mod telemetry;

pub use cohort::{evaluate_cohort, promotion_preview, CohortOptions, CohortReport, StudentScores};
pub use engine::{GradingEngine, OverallResult, SubjectResult};
pub use error::ConfigurationError;
pub use policy::{GradingPolicy, PolicyConfig, PolicySettings};
pub use ranking::{rank, rank_ordered, RankEntry};
pub use scale::{resolve_band, GradeBand, GradeScale};
