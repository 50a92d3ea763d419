use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    Histogram, HistogramVec, IntCounter, IntCounterVec,
};

lazy_static! {
    /// Duration of feed queries by outcome (ok, transient, data_integrity).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_request_duration_seconds",
        "Feed query duration segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_request_duration_seconds");

    /// Total feed queries by outcome.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed queries segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register feed_request_total");

    /// Rows or comment payloads that failed to decode.
    pub static ref FEED_DATA_INTEGRITY_ERRORS: IntCounter = register_int_counter!(
        "feed_data_integrity_errors_total",
        "Feed rows rejected because their stored shape was malformed"
    )
    .expect("failed to register feed_data_integrity_errors_total");

    /// Posts returned per successful page.
    pub static ref FEED_POSTS_RETURNED: Histogram = register_histogram!(
        "feed_posts_returned",
        "Number of posts returned per feed page",
        vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("failed to register feed_posts_returned");
}

/// Record one finished feed query.
pub fn observe_request(outcome: &str, elapsed_secs: f64) {
    FEED_REQUEST_TOTAL.with_label_values(&[outcome]).inc();
    FEED_REQUEST_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(elapsed_secs);
}
