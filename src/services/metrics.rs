//! Prometheus metrics for invoice-admin-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    HistogramVec, TextEncoder,
};

/// HTTP request counter by method, path and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_admin_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register http_requests_total")
});

/// HTTP request duration histogram by method and path.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_admin_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register http_request_duration")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_admin_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Invoices created.
pub static INVOICES_CREATED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "invoice_admin_invoices_created_total",
        "Total number of invoices created"
    )
    .expect("Failed to register invoices_created_total")
});

/// Line items attached to invoices.
pub static LINE_ITEMS_CREATED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "invoice_admin_line_items_created_total",
        "Total number of line items created"
    )
    .expect("Failed to register line_items_created_total")
});

/// Customers created implicitly during invoice creation.
pub static CUSTOMERS_CREATED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "invoice_admin_customers_created_total",
        "Total number of customers created during invoice creation"
    )
    .expect("Failed to register customers_created_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&INVOICES_CREATED_TOTAL);
    Lazy::force(&LINE_ITEMS_CREATED_TOTAL);
    Lazy::force(&CUSTOMERS_CREATED_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
