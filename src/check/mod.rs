//! Return-documentation checks.

mod reconcile;
mod runner;
mod suppress;
mod types;

pub use reconcile::{check_function, ReturnDocChecker};
pub use runner::Checker;
pub use suppress::{
    collect_suppressions, filter_suppressed, matches_suppression, parse_suppressions,
    SuppressedViolation, Suppression, SuppressionType,
};
pub use types::{CheckResult, Rule, Severity, Violation};
