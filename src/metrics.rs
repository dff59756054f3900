/// Metrics and telemetry for the admin console
///
/// Prometheus-compatible counters for:
/// - HTTP request counts
/// - Lifecycle decisions and dispute resolutions
/// - Audit trail appends (written vs deduplicated)
/// - Ordered-fetch fallbacks taken against index-less backends

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// Account lifecycle decisions by action
    pub static ref LIFECYCLE_DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "lifecycle_decisions_total",
        "Total number of account lifecycle decisions",
        &["action"]
    )
    .unwrap();

    /// Disputes moved to resolved
    pub static ref DISPUTES_RESOLVED_TOTAL: IntCounter = register_int_counter!(
        "disputes_resolved_total",
        "Total number of disputes resolved"
    )
    .unwrap();

    /// Audit trail appends by outcome
    pub static ref AUDIT_APPENDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "audit_appends_total",
        "Total number of audit trail appends",
        &["outcome"]
    )
    .unwrap();

    /// Ordered fetches that fell back to a local sort, by collection
    pub static ref ORDER_FALLBACKS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "order_fallbacks_total",
        "Total number of ordered fetches served by the local-sort fallback",
        &["collection"]
    )
    .unwrap();

    /// Admin sign-in attempts by outcome
    pub static ref ADMIN_SIGN_INS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "admin_sign_ins_total",
        "Total number of admin sign-in attempts",
        &["outcome"]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
}

/// Record a lifecycle decision (approve_user, reject_user, suspend_user)
pub fn record_lifecycle_decision(action: &str) {
    LIFECYCLE_DECISIONS_TOTAL.with_label_values(&[action]).inc();
}

/// Record a dispute resolution
pub fn record_dispute_resolved() {
    DISPUTES_RESOLVED_TOTAL.inc();
}

/// Record an audit append outcome ("written" or "deduplicated")
pub fn record_audit_append(outcome: &str) {
    AUDIT_APPENDS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record an ordered fetch served by the local-sort fallback
pub fn record_order_fallback(collection: &str) {
    ORDER_FALLBACKS_TOTAL.with_label_values(&[collection]).inc();
}

/// Record an admin sign-in attempt ("ok" or "failed")
pub fn record_sign_in(outcome: &str) {
    ADMIN_SIGN_INS_TOTAL.with_label_values(&[outcome]).inc();
}
