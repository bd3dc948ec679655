//! The service response envelope and its construction helpers.
//!
//! Every remote call result is wrapped in an [`Envelope`]: the payload plus a
//! [`ResponseMeta`] block with pagination, timing and error state. On the
//! wire the metadata is flattened next to `data`:
//!
//! ```json
//! { "data": [1, 2], "start": 0, "amount": 2, "status": "success", ... }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observable::ErrorList;
use crate::status::{ServiceErrorType, ServiceStatus};
use crate::types::{self, Timestamp};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page size recorded by [`Envelope::wrap`] when the caller does not set one.
pub const DEFAULT_AMOUNT: i32 = 1;

/// Total count recorded by [`Envelope::wrap`] when the caller does not set one.
pub const DEFAULT_TOTAL_COUNT: i64 = 0;

// ---------------------------------------------------------------------------
// ResponseMeta
// ---------------------------------------------------------------------------

/// Metadata shared by every envelope regardless of its payload type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Pagination offset.
    pub start: i32,
    /// Page size. Always 0 when the envelope has no data.
    pub amount: i32,
    /// Total logical item count when the result is paginated.
    pub total_count: Option<i64>,
    /// When the envelope was built (UTC).
    pub request_timestamp: Timestamp,
    /// When the producer finished processing, if it measured it.
    pub processing_timestamp: Option<Timestamp>,
    pub elapsed_time: Duration,
    pub message: Option<String>,
    pub error_message: Option<String>,
    pub status: ServiceStatus,
    pub service_error_type: ServiceErrorType,
    /// Detail errors, observable by a UI layer.
    pub errors: ErrorList,
    /// HTTP-like status code reported by the remote service.
    pub status_code: i32,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            start: 0,
            amount: 0,
            total_count: None,
            request_timestamp: types::now(),
            processing_timestamp: None,
            elapsed_time: Duration::ZERO,
            message: None,
            error_message: None,
            status: ServiceStatus::default(),
            service_error_type: ServiceErrorType::default(),
            errors: ErrorList::new(),
            status_code: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// WrapOptions
// ---------------------------------------------------------------------------

/// Optional metadata applied by [`Envelope::wrap`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrapOptions {
    pub start: i32,
    pub amount: i32,
    pub processing_timestamp: Option<Timestamp>,
    pub total_count: Option<i64>,
    pub message: Option<String>,
    pub error_message: Option<String>,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            start: 0,
            amount: DEFAULT_AMOUNT,
            processing_timestamp: None,
            total_count: Some(DEFAULT_TOTAL_COUNT),
            message: None,
            error_message: None,
        }
    }
}

impl WrapOptions {
    pub fn with_start(mut self, start: i32) -> Self {
        self.start = start;
        self
    }

    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_processing_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.processing_timestamp = Some(timestamp);
        self
    }

    pub fn with_total_count(mut self, total_count: i64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error_message(mut self, error_message: impl Into<String>) -> Self {
        self.error_message = Some(error_message.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A remote call result: payload plus [`ResponseMeta`].
///
/// `data` is `None` when the call produced nothing; in that case
/// `meta.amount` is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(flatten)]
    pub meta: ResponseMeta,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            data: None,
            meta: ResponseMeta::default(),
        }
    }
}

impl<T> Envelope<T> {
    /// Wrap a payload, stamping the request time with the current UTC time.
    ///
    /// `amount` is forced to 0 when `data` is `None`.
    pub fn wrap(data: Option<T>, options: WrapOptions) -> Self {
        let amount = if data.is_some() { options.amount } else { 0 };
        Self {
            data,
            meta: ResponseMeta {
                start: options.start,
                amount,
                total_count: options.total_count,
                processing_timestamp: options.processing_timestamp,
                message: options.message,
                error_message: options.error_message,
                ..ResponseMeta::default()
            },
        }
    }

    /// Build an error envelope with no payload.
    pub fn failure(error_type: ServiceErrorType, error_message: impl Into<String>) -> Self {
        let options = WrapOptions::default().with_error_message(error_message);
        let mut envelope = Self::wrap(None, options);
        envelope.meta.status = ServiceStatus::Error;
        envelope.meta.service_error_type = error_type;
        envelope
    }

    /// Derive an envelope with a different payload type.
    ///
    /// Copies status, error message, elapsed time, detail errors and error
    /// type. `message` replaces the source message unless it is empty. The
    /// new envelope has no data and a fresh request timestamp. Detail errors
    /// are copied, so later mutations of either list stay local.
    pub fn retype<U>(&self, message: &str) -> Envelope<U> {
        let source = &self.meta;
        let message = if message.is_empty() {
            source.message.clone()
        } else {
            Some(message.to_string())
        };

        Envelope {
            data: None,
            meta: ResponseMeta {
                status: source.status,
                error_message: source.error_message.clone(),
                message,
                elapsed_time: source.elapsed_time,
                errors: source.errors.clone(),
                service_error_type: source.service_error_type,
                ..ResponseMeta::default()
            },
        }
    }

    pub fn with_status(mut self, status: ServiceStatus) -> Self {
        self.meta.status = status;
        self
    }

    /// Record the remote status code.
    ///
    /// When no error type has been set yet, it is derived from the code.
    pub fn with_status_code(mut self, status_code: i32) -> Self {
        self.meta.status_code = status_code;
        if self.meta.service_error_type == ServiceErrorType::None {
            self.meta.service_error_type = ServiceErrorType::from_status_code(status_code);
        }
        self
    }

    pub fn with_elapsed_time(mut self, elapsed: Duration) -> Self {
        self.meta.elapsed_time = elapsed;
        self
    }

    /// Replace the detail error list, e.g. with one built from
    /// [`EnvelopeConfig`](crate::config::EnvelopeConfig).
    pub fn with_errors(mut self, errors: ErrorList) -> Self {
        self.meta.errors = errors;
        self
    }

    /// Append a detail error.
    pub fn push_error(&mut self, detail: impl Into<String>) {
        self.meta.errors.push(detail);
    }

    /// Whether the envelope carries a non-empty error message.
    pub fn has_error_message(&self) -> bool {
        self.meta
            .error_message
            .as_deref()
            .is_some_and(|msg| !msg.is_empty())
    }

    /// A call succeeded when it reported no error message and its status is
    /// a success status. An `Unknown` status is not a success.
    pub fn is_success(&self) -> bool {
        !self.has_error_message() && self.meta.status.is_success()
    }
}

// ---------------------------------------------------------------------------
// IntoEnvelope
// ---------------------------------------------------------------------------

/// Extension for wrapping any value directly: `items.into_envelope()`.
pub trait IntoEnvelope: Sized {
    /// Wrap with default options.
    fn into_envelope(self) -> Envelope<Self> {
        Envelope::wrap(Some(self), WrapOptions::default())
    }

    fn into_envelope_with(self, options: WrapOptions) -> Envelope<Self> {
        Envelope::wrap(Some(self), options)
    }
}

impl<T> IntoEnvelope for T {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- wrap --

    #[test]
    fn wrap_keeps_requested_amount_when_data_present() {
        let envelope = Envelope::wrap(Some(vec![1, 2, 3]), WrapOptions::default().with_amount(3));
        assert_eq!(envelope.meta.amount, 3);
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn wrap_forces_zero_amount_without_data() {
        let envelope: Envelope<String> =
            Envelope::wrap(None, WrapOptions::default().with_amount(25));
        assert_eq!(envelope.meta.amount, 0);
    }

    #[test]
    fn wrap_applies_defaults() {
        let envelope = "payload".to_string().into_envelope();
        assert_eq!(envelope.meta.start, 0);
        assert_eq!(envelope.meta.amount, DEFAULT_AMOUNT);
        assert_eq!(envelope.meta.total_count, Some(DEFAULT_TOTAL_COUNT));
        assert_eq!(envelope.meta.processing_timestamp, None);
        assert_eq!(envelope.meta.message, None);
        assert_eq!(envelope.meta.error_message, None);
        assert_eq!(envelope.meta.status, ServiceStatus::Unknown);
        assert!(envelope.meta.errors.is_empty());
    }

    #[test]
    fn wrap_stamps_request_time_within_call_window() {
        let before = types::now();
        let envelope = 7.into_envelope();
        let after = types::now();
        assert!(envelope.meta.request_timestamp >= before);
        assert!(envelope.meta.request_timestamp <= after);
    }

    #[test]
    fn wrap_copies_every_option() {
        let processed = types::now();
        let envelope = 1u8.into_envelope_with(
            WrapOptions::default()
                .with_start(40)
                .with_amount(20)
                .with_total_count(512)
                .with_processing_timestamp(processed)
                .with_message("page 3")
                .with_error_message("partial"),
        );
        assert_eq!(envelope.meta.start, 40);
        assert_eq!(envelope.meta.amount, 20);
        assert_eq!(envelope.meta.total_count, Some(512));
        assert_eq!(envelope.meta.processing_timestamp, Some(processed));
        assert_eq!(envelope.meta.message.as_deref(), Some("page 3"));
        assert_eq!(envelope.meta.error_message.as_deref(), Some("partial"));
    }

    // -- retype --

    fn failed_source() -> Envelope<Vec<i32>> {
        let mut source = Envelope::wrap(Some(vec![1]), WrapOptions::default().with_start(10))
            .with_status(ServiceStatus::Error)
            .with_status_code(404)
            .with_elapsed_time(Duration::from_millis(250));
        source.meta.message = Some("lookup".into());
        source.meta.error_message = Some("not found".into());
        source.push_error("id 7 missing");
        source
    }

    #[test]
    fn retype_copies_error_metadata() {
        let source = failed_source();
        let target: Envelope<String> = source.retype("");

        assert_eq!(target.meta.status, source.meta.status);
        assert_eq!(target.meta.error_message, source.meta.error_message);
        assert_eq!(target.meta.elapsed_time, source.meta.elapsed_time);
        assert_eq!(target.meta.service_error_type, ServiceErrorType::NotFound);
        assert_eq!(target.meta.errors, source.meta.errors);
        assert_eq!(target.meta.message.as_deref(), Some("lookup"));
    }

    #[test]
    fn retype_does_not_copy_payload_or_pagination() {
        let source = failed_source();
        let target: Envelope<String> = source.retype("");

        assert_eq!(target.data, None);
        assert_eq!(target.meta.start, 0);
        assert_eq!(target.meta.amount, 0);
        assert_eq!(target.meta.status_code, 0);
        assert!(target.meta.request_timestamp >= source.meta.request_timestamp);
    }

    #[test]
    fn retype_message_override() {
        let source = failed_source();
        let target: Envelope<()> = source.retype("X");
        assert_eq!(target.meta.message.as_deref(), Some("X"));
    }

    #[test]
    fn retype_detaches_error_list() {
        let source = failed_source();
        let mut target: Envelope<()> = source.retype("");
        target.push_error("added downstream");

        assert_eq!(source.meta.errors.len(), 1);
        assert_eq!(target.meta.errors.len(), 2);
    }

    // -- status helpers --

    #[test]
    fn failure_builds_error_envelope() {
        let envelope: Envelope<u32> = Envelope::failure(ServiceErrorType::Timeout, "took too long");
        assert!(!envelope.is_success());
        assert!(envelope.has_error_message());
        assert_eq!(envelope.meta.status, ServiceStatus::Error);
        assert_eq!(envelope.meta.amount, 0);
    }

    #[test]
    fn empty_error_message_is_not_an_error() {
        let envelope = 5
            .into_envelope_with(WrapOptions::default().with_error_message(""))
            .with_status(ServiceStatus::Success);
        assert!(!envelope.has_error_message());
        assert!(envelope.is_success());
    }

    #[test]
    fn unknown_status_is_not_success() {
        let envelope = 5.into_envelope();
        assert_eq!(envelope.meta.status, ServiceStatus::Unknown);
        assert!(!envelope.is_success());
        assert_eq!(envelope.is_success(), envelope.meta.status.is_success());

        let envelope = envelope.with_status(ServiceStatus::Warning);
        assert!(envelope.is_success());
    }

    #[test]
    fn explicit_error_type_survives_status_code() {
        let mut envelope = 5.into_envelope().with_status(ServiceStatus::Error);
        envelope.meta.service_error_type = ServiceErrorType::Network;
        let envelope = envelope.with_status_code(500);
        assert_eq!(envelope.meta.service_error_type, ServiceErrorType::Network);
        assert_eq!(envelope.meta.status_code, 500);
    }

    // -- serialization --

    #[test]
    fn metadata_is_flattened_next_to_data() {
        let envelope = vec!["a", "b"].into_envelope_with(WrapOptions::default().with_amount(2));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
        assert_eq!(json["amount"], 2);
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["errors"], serde_json::json!([]));
        assert!(json.get("meta").is_none());
    }
}
