//! Extracting payloads from envelopes at the end of a call chain.
//!
//! A missing envelope or one carrying an error message is a failed call.
//! [`UnwrapPolicy`] decides what the caller observes: `Recover` logs a
//! warning and hands back the default value, `Strict` logs an error and
//! propagates it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::EnvelopeError;

/// Message substituted when a failed envelope carries no message of its own.
const FALLBACK_MESSAGE: &str = "Error";

// ---------------------------------------------------------------------------
// UnwrapPolicy
// ---------------------------------------------------------------------------

/// How [`get_data`] reacts to a failed or missing envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnwrapPolicy {
    /// Log a warning and return the default value.
    #[default]
    Recover,
    /// Log an error and return it to the caller.
    Strict,
}

impl fmt::Display for UnwrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recover => f.write_str("recover"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for UnwrapPolicy {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recover" => Ok(Self::Recover),
            "strict" => Ok(Self::Strict),
            other => Err(EnvelopeError::Config(format!(
                "unknown unwrap policy '{other}', expected 'recover' or 'strict'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Unwrapping
// ---------------------------------------------------------------------------

/// Extract the payload of `response`, substituting `default` on failure.
///
/// A successful envelope without data also yields `default`. Under
/// [`UnwrapPolicy::Recover`] this never returns `Err`.
pub fn get_data<T>(
    response: Option<Envelope<T>>,
    default: T,
    policy: UnwrapPolicy,
) -> Result<T, EnvelopeError> {
    match check(response) {
        Ok(data) => Ok(data.unwrap_or(default)),
        Err(err) => match policy {
            UnwrapPolicy::Recover => {
                tracing::warn!(error = %err, "Service call failed, substituting default value");
                Ok(default)
            }
            UnwrapPolicy::Strict => {
                tracing::error!(error = %err, "Service call failed");
                Err(err)
            }
        },
    }
}

impl<T> Envelope<T> {
    /// Consume the envelope, returning its data or the failure it carries.
    pub fn into_result(self) -> Result<Option<T>, EnvelopeError> {
        check(Some(self))
    }

    /// Consume the envelope, returning its data or `default` on failure.
    pub fn into_data_or(self, default: T) -> T {
        match self.into_result() {
            Ok(data) => data.unwrap_or(default),
            Err(err) => {
                tracing::warn!(error = %err, "Service call failed, substituting default value");
                default
            }
        }
    }
}

fn check<T>(response: Option<Envelope<T>>) -> Result<Option<T>, EnvelopeError> {
    let Some(response) = response else {
        return Err(EnvelopeError::NullResponse);
    };

    match response.meta.error_message.as_deref() {
        Some(error_message) if !error_message.is_empty() => {
            let message = response
                .meta
                .message
                .as_deref()
                .filter(|msg| !msg.is_empty())
                .unwrap_or(FALLBACK_MESSAGE);
            Err(EnvelopeError::Service {
                type_name: payload_type_name::<T>(),
                message: message.to_string(),
                error_message: error_message.to_string(),
            })
        }
        _ => Ok(response.data),
    }
}

// ---------------------------------------------------------------------------
// Type naming
// ---------------------------------------------------------------------------

/// Name of `T` with module paths stripped: `Vec<String>` rather than
/// `alloc::vec::Vec<alloc::string::String>`.
pub fn payload_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut name = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            name.truncate(segment_start);
            continue;
        }
        name.push(c);
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            segment_start = name.len();
        }
    }
    name
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
