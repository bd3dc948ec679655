//! Capability trait for manipulating an envelope without naming its
//! payload type.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::envelope::{Envelope, ResponseMeta};
use crate::error::EnvelopeError;
use crate::observable::ErrorList;
use crate::status::{ServiceErrorType, ServiceStatus};
use crate::types::Timestamp;
use crate::unwrap::payload_type_name;

/// Field access shared by every envelope-like type.
///
/// Implementors provide the metadata block, a payload presence check and an
/// untyped [`set_data`](ServiceResponse::set_data); every accessor is
/// derived from those.
pub trait ServiceResponse {
    fn meta(&self) -> &ResponseMeta;

    fn meta_mut(&mut self) -> &mut ResponseMeta;

    /// Whether a payload is currently set.
    fn has_data(&self) -> bool;

    /// Replace the payload with an untyped value.
    ///
    /// `Value::Null` unsets the payload and resets `amount` to 0. Any other
    /// value must be assignable to the payload type, otherwise
    /// [`EnvelopeError::TypeMismatch`] is returned and the envelope is left
    /// unchanged.
    fn set_data(&mut self, data: serde_json::Value) -> Result<(), EnvelopeError>;

    fn error_message(&self) -> Option<&str> {
        self.meta().error_message.as_deref()
    }

    fn set_error_message(&mut self, error_message: Option<String>) {
        self.meta_mut().error_message = error_message;
    }

    fn message(&self) -> Option<&str> {
        self.meta().message.as_deref()
    }

    fn set_message(&mut self, message: Option<String>) {
        self.meta_mut().message = message;
    }

    fn amount(&self) -> i32 {
        self.meta().amount
    }

    /// Set the page size. Stays 0 while no payload is set.
    fn set_amount(&mut self, amount: i32) {
        let amount = if self.has_data() { amount } else { 0 };
        self.meta_mut().amount = amount;
    }

    fn start(&self) -> i32 {
        self.meta().start
    }

    fn set_start(&mut self, start: i32) {
        self.meta_mut().start = start;
    }

    fn total_count(&self) -> Option<i64> {
        self.meta().total_count
    }

    fn set_total_count(&mut self, total_count: Option<i64>) {
        self.meta_mut().total_count = total_count;
    }

    fn status(&self) -> ServiceStatus {
        self.meta().status
    }

    fn set_status(&mut self, status: ServiceStatus) {
        self.meta_mut().status = status;
    }

    fn elapsed_time(&self) -> Duration {
        self.meta().elapsed_time
    }

    fn set_elapsed_time(&mut self, elapsed: Duration) {
        self.meta_mut().elapsed_time = elapsed;
    }

    fn errors(&self) -> &ErrorList {
        &self.meta().errors
    }

    fn errors_mut(&mut self) -> &mut ErrorList {
        &mut self.meta_mut().errors
    }

    fn set_errors(&mut self, errors: ErrorList) {
        self.meta_mut().errors = errors;
    }

    fn service_error_type(&self) -> ServiceErrorType {
        self.meta().service_error_type
    }

    fn set_service_error_type(&mut self, error_type: ServiceErrorType) {
        self.meta_mut().service_error_type = error_type;
    }

    fn request_timestamp(&self) -> Timestamp {
        self.meta().request_timestamp
    }

    fn processing_timestamp(&self) -> Option<Timestamp> {
        self.meta().processing_timestamp
    }

    fn set_processing_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.meta_mut().processing_timestamp = timestamp;
    }

    fn status_code(&self) -> i32 {
        self.meta().status_code
    }

    fn set_status_code(&mut self, status_code: i32) {
        self.meta_mut().status_code = status_code;
    }
}

impl<T: DeserializeOwned> ServiceResponse for Envelope<T> {
    fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ResponseMeta {
        &mut self.meta
    }

    fn has_data(&self) -> bool {
        self.data.is_some()
    }

    fn set_data(&mut self, data: serde_json::Value) -> Result<(), EnvelopeError> {
        if data.is_null() {
            self.data = None;
            self.meta.amount = 0;
            return Ok(());
        }

        let typed = serde_json::from_value::<T>(data).map_err(|e| {
            EnvelopeError::TypeMismatch(format!(
                "cannot assign data to {}: {e}",
                payload_type_name::<T>()
            ))
        })?;
        self.data = Some(typed);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
