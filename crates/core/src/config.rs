//! Envelope behaviour loaded from the environment.

use crate::envelope::{Envelope, WrapOptions};
use crate::error::EnvelopeError;
use crate::observable::{ErrorList, DEFAULT_CHANGE_CAPACITY};
use crate::unwrap::{get_data, UnwrapPolicy};

/// Envelope behaviour loaded from environment variables.
///
/// All fields have defaults, so an empty environment yields a usable
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// How failed envelopes are unwrapped (default: `recover`).
    pub unwrap_policy: UnwrapPolicy,
    /// Change buffer size for detail-error lists (default: `64`).
    pub error_channel_capacity: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            unwrap_policy: UnwrapPolicy::default(),
            error_channel_capacity: DEFAULT_CHANGE_CAPACITY,
        }
    }
}

impl EnvelopeConfig {
    /// Read a `.env` file if present, then load from the environment.
    pub fn load() -> Result<Self, EnvelopeError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default   |
    /// |-----------------------------------|-----------|
    /// | `ENVELOPE_UNWRAP_POLICY`          | `recover` |
    /// | `ENVELOPE_ERROR_CHANNEL_CAPACITY` | `64`      |
    pub fn from_env() -> Result<Self, EnvelopeError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, EnvelopeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let unwrap_policy = match lookup("ENVELOPE_UNWRAP_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.unwrap_policy,
        };

        let error_channel_capacity = match lookup("ENVELOPE_ERROR_CHANNEL_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(EnvelopeError::Config(format!(
                        "ENVELOPE_ERROR_CHANNEL_CAPACITY must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => defaults.error_channel_capacity,
        };

        tracing::debug!(%unwrap_policy, error_channel_capacity, "Loaded envelope configuration");

        Ok(Self {
            unwrap_policy,
            error_channel_capacity,
        })
    }

    /// An empty detail-error list sized by this configuration.
    pub fn error_list(&self) -> ErrorList {
        ErrorList::with_capacity(self.error_channel_capacity)
    }

    /// Give an existing envelope, e.g. one just deserialized, a detail-error
    /// list sized by this configuration. Items are kept.
    pub fn adopt<T>(&self, envelope: &mut Envelope<T>) {
        let errors = std::mem::take(&mut envelope.meta.errors);
        envelope.meta.errors = errors.with_change_capacity(self.error_channel_capacity);
    }

    /// [`Envelope::wrap`] with a configured detail-error list.
    pub fn wrap<T>(&self, data: Option<T>, options: WrapOptions) -> Envelope<T> {
        Envelope::wrap(data, options).with_errors(self.error_list())
    }

    /// [`get_data`] under the configured unwrap policy.
    pub fn get_data<T>(
        &self,
        response: Option<Envelope<T>>,
        default: T,
    ) -> Result<T, EnvelopeError> {
        get_data(response, default, self.unwrap_policy)
    }
}
