use std::path::Path;

use kgr_core::errors::{ErrorInfo, KgrError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("index", "2")
        .with_context("reason", "example")
}

#[test]
fn domain_error_surface() {
    let err = KgrError::Domain(sample_info("linear_count", "count of one"));
    assert_eq!(err.info().code, "linear_count");
    assert!(err.info().context.contains_key("index"));
}

#[test]
fn dispatch_error_surface() {
    let err = KgrError::Dispatch(sample_info("run_exit", "exit status 3").with_hint("check log"));
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "dispatch error: [run_exit] exit status 3 {index=2, reason=example} hint: check log"
    );
}

#[test]
fn io_helper_records_path() {
    let err = KgrError::io("config_read", Path::new("config.json"), "not found");
    assert_eq!(err.info().context.get("path").map(String::as_str), Some("config.json"));
    assert!(matches!(err, KgrError::Io(_)));
}

#[test]
fn errors_round_trip_json() {
    let err = KgrError::Secrets(sample_info("secrets_truncated", "short read"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Secrets\""));
    let decoded: KgrError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
