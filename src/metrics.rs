//! Metric helpers for `replayframe`.
//!
//! This module defines metric names and thin helpers over the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

use crate::dispatch::RecordClass;

/// Name of the counter tracking dispatched records.
pub const RECORDS_TOTAL: &str = "replayframe_records_total";
/// Name of the counter tracking run-ending errors.
pub const ERRORS_TOTAL: &str = "replayframe_errors_total";
/// Name of the counter tracking completed runs.
pub const RUNS_TOTAL: &str = "replayframe_runs_total";

/// Record a dispatched record of the given class.
pub fn inc_records(class: RecordClass) {
    #[cfg(feature = "metrics")]
    metrics::counter!(RECORDS_TOTAL, "class" => class.label()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = class;
}

/// Record a run-ending error of the given kind.
pub fn inc_errors(kind: &'static str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}

/// Record a completed run.
pub fn inc_runs(success: bool) {
    #[cfg(feature = "metrics")]
    metrics::counter!(RUNS_TOTAL, "outcome" => if success { "success" } else { "failure" })
        .increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = success;
}
