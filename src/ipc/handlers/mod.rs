pub mod core;
pub mod grading;
pub mod policy;
pub mod ranking;
pub mod reports;
