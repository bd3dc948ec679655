//! End-to-end tests for wrapping, re-typing and unwrapping envelopes.
//!
//! Covers the round trip a caller performs: wrap raw data, pass it down a
//! call chain under a different payload type, and unwrap at the end under
//! both unwrap policies.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use restclient_core::{
    get_data, Envelope, EnvelopeConfig, EnvelopeError, IntoEnvelope, ServiceErrorType,
    ServiceResponse, ServiceStatus, UnwrapPolicy, WrapOptions,
};

fn failed_lookup() -> Envelope<Vec<u64>> {
    let mut envelope: Envelope<Vec<u64>> = Envelope::failure(ServiceErrorType::NotFound, "boom")
        .with_elapsed_time(Duration::from_millis(80));
    envelope.meta.message = Some("lookup".into());
    envelope.push_error("user 12 missing");
    envelope
}

// ---------------------------------------------------------------------------
// Test: amount follows data presence
// ---------------------------------------------------------------------------

#[test]
fn amount_matches_request_only_when_data_present() {
    for amount in [0, 1, 50] {
        let present = vec![1].into_envelope_with(WrapOptions::default().with_amount(amount));
        assert_eq!(present.meta.amount, amount);

        let absent: Envelope<Vec<i32>> =
            Envelope::wrap(None, WrapOptions::default().with_amount(amount));
        assert_eq!(absent.meta.amount, 0);
    }
}

// ---------------------------------------------------------------------------
// Test: retype then unwrap
// ---------------------------------------------------------------------------

#[test]
fn retyped_failure_keeps_error_state_for_unwrap() {
    let source = failed_lookup();
    let summary: Envelope<String> = source.retype("");

    assert_eq!(summary.status(), ServiceStatus::Error);
    assert_eq!(summary.service_error_type(), ServiceErrorType::NotFound);
    assert_eq!(summary.elapsed_time(), Duration::from_millis(80));
    assert_eq!(summary.errors().as_slice(), source.meta.errors.as_slice());

    let err = get_data(Some(summary), String::new(), UnwrapPolicy::Strict).unwrap_err();
    assert_eq!(err.to_string(), "error for type String : lookup - boom");
}

#[test]
fn retype_override_message_reaches_diagnostic() {
    let summary: Envelope<u32> = failed_lookup().retype("count users");
    let err = get_data(Some(summary), 0, UnwrapPolicy::Strict).unwrap_err();
    assert_matches!(err, EnvelopeError::Service { message, .. } if message == "count users");
}

#[test]
fn retyped_error_list_is_independent() {
    let source = failed_lookup();
    let mut source_changes = source.meta.errors.subscribe();

    let mut derived: Envelope<()> = source.retype("");
    derived.push_error("added by caller");

    assert_eq!(source.meta.errors.len(), 1);
    assert_eq!(derived.meta.errors.len(), 2);
    assert!(source_changes.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: unwrap policies
// ---------------------------------------------------------------------------

#[test]
fn successful_envelope_unwraps_to_data() {
    let envelope = 42.into_envelope();
    assert_eq!(get_data(Some(envelope), 0, UnwrapPolicy::Recover).unwrap(), 42);
}

#[test]
fn missing_envelope_under_both_policies() {
    let (recovered, logs) =
        common::with_captured_logs(|| get_data::<i32>(None, 7, UnwrapPolicy::Recover));
    assert_eq!(recovered.unwrap(), 7);
    assert!(logs.contains("WARN"), "expected a warning, got: {logs}");
    assert!(logs.contains("Null response received from server"));

    let (strict, logs) =
        common::with_captured_logs(|| get_data::<i32>(None, 7, UnwrapPolicy::Strict));
    assert_matches!(strict, Err(EnvelopeError::NullResponse));
    assert!(logs.contains("ERROR"), "expected an error, got: {logs}");
}

#[test]
fn errored_envelope_under_both_policies() {
    let errored = || 3.into_envelope_with(WrapOptions::default().with_error_message("boom"));

    let (recovered, logs) =
        common::with_captured_logs(|| get_data(Some(errored()), 0, UnwrapPolicy::Recover));
    assert_eq!(recovered.unwrap(), 0);
    assert!(logs.contains("error for type i32 : Error - boom"), "got: {logs}");

    let strict = get_data(Some(errored()), 0, UnwrapPolicy::Strict);
    assert_matches!(
        strict,
        Err(EnvelopeError::Service { type_name, error_message, .. })
            if type_name == "i32" && error_message == "boom"
    );
}

#[test]
fn default_configuration_recovers() {
    let config = EnvelopeConfig::default();
    let envelope: Envelope<Vec<String>> = Envelope::failure(ServiceErrorType::Server, "down");
    assert_eq!(config.get_data(Some(envelope), Vec::new()).unwrap(), Vec::<String>::new());
}

// ---------------------------------------------------------------------------
// Test: wire shape
// ---------------------------------------------------------------------------

#[test]
fn envelope_survives_json_round_trip() {
    let mut envelope = vec!["a".to_string()].into_envelope_with(
        WrapOptions::default()
            .with_total_count(10)
            .with_message("first page"),
    );
    envelope.push_error("truncated");
    envelope = envelope.with_status(ServiceStatus::Warning).with_status_code(206);

    let json = serde_json::to_string(&envelope).unwrap();
    let back: Envelope<Vec<String>> = serde_json::from_str(&json).unwrap();

    assert_eq!(back, envelope);
}
