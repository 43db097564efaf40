//! Metric names and recorders for bill-service.
//!
//! Exported through the Prometheus recorder installed by
//! `service_core::observability::init_metrics`.

use metrics::{counter, histogram};

pub const DB_QUERY_DURATION: &str = "bill_db_query_duration_seconds";
pub const LIST_REQUESTS: &str = "bill_list_requests_total";
pub const ERRORS: &str = "bill_list_errors_total";

/// Record database query duration by operation.
pub fn record_db_query(operation: &'static str, duration_secs: f64) {
    histogram!(DB_QUERY_DURATION, "operation" => operation).record(duration_secs);
}

/// Record how a list request ended (`found`, `empty`, `failed`).
pub fn record_list_outcome(outcome: &'static str) {
    counter!(LIST_REQUESTS, "outcome" => outcome).increment(1);
}

/// Record a masked or propagated data-access failure.
pub fn record_error(error_type: &'static str) {
    counter!(ERRORS, "error_type" => error_type).increment(1);
}
