//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use callscope_core::{
    CallRecord, Config, EventKind, EventMarker, Sentiment, Speaker, TranscriptLine,
};
use callscope_timeline::{CallTimeline, Session, sample::sample_call};
use std::path::Path;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Session over the built-in demo call with default settings
pub fn sample_session() -> Session {
    let call = CallTimeline::new(sample_call()).expect("sample call validates");
    Session::new(call, &Config::default())
}

/// Short call with one of each marker kind
pub fn create_test_record(id: &str) -> CallRecord {
    let mut record = CallRecord::new(id, 120.0);
    record.title = Some(format!("Test call {id}"));
    record.transcript = vec![
        TranscriptLine::new(1, Speaker::Agent, "Thanks for taking the call", 0.0, 6.0)
            .with_sentiment(Sentiment::Positive),
        TranscriptLine::new(2, Speaker::Customer, "Our budget is tight this year", 10.0, 8.0)
            .with_sentiment(Sentiment::Negative)
            .flagged("Budget constraint mentioned"),
        TranscriptLine::new(3, Speaker::Agent, "We have a starter tier", 20.0, 10.0),
    ];
    record.markers = vec![
        EventMarker::new(1, EventKind::DeadAir, 6.0).with_duration(4.0),
        EventMarker::new(2, EventKind::BudgetConcern, 10.0),
        EventMarker::new(3, EventKind::Objection, 12.0),
        EventMarker::new(4, EventKind::Interruption, 19.5),
        EventMarker::new(5, EventKind::KeyPoint, 25.0).with_label("Buying Signal"),
    ];
    record
}

/// Write `record` as `<dir>/<id>.json`
pub fn write_record(dir: &Path, record: &CallRecord) {
    let path = dir.join(format!("{}.json", record.id));
    let json = serde_json::to_string_pretty(record).expect("record serializes");
    std::fs::write(path, json).expect("record written");
}

/// Assert two floats agree to within `1e-9`
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9,
        "expected {expected}, got {actual}"
    );
}
