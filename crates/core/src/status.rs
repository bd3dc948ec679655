//! Outcome classification for service responses.
//!
//! [`ServiceStatus`] is the coarse outcome of a call; [`ServiceErrorType`]
//! narrows down why a call failed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ServiceStatus
// ---------------------------------------------------------------------------

/// Coarse outcome of a remote call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No outcome has been recorded yet.
    #[default]
    Unknown,
    Success,
    /// The call completed but reported non-fatal problems.
    Warning,
    Error,
}

impl ServiceStatus {
    /// Whether the status represents a completed call without errors.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::Warning)
    }
}

// ---------------------------------------------------------------------------
// ServiceErrorType
// ---------------------------------------------------------------------------

/// Finer-grained classification of a failed call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorType {
    #[default]
    None,
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    Timeout,
    Network,
    Server,
    Unknown,
}

impl ServiceErrorType {
    /// Classify an HTTP-like status code.
    ///
    /// Codes below 400 are not errors. Unrecognised 4xx codes map to
    /// `Validation`, 5xx codes map to `Server` (504 maps to `Timeout`) and
    /// anything else that is not a success maps to `Unknown`.
    pub fn from_status_code(code: i32) -> Self {
        match code {
            0..=399 => Self::None,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            400..=499 => Self::Validation,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
