/// Failures raised while unwrapping, converting or configuring envelopes.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The envelope itself was absent.
    #[error("Null response received from server")]
    NullResponse,

    /// The envelope was present but carried a non-empty error message.
    #[error("error for type {type_name} : {message} - {error_message}")]
    Service {
        type_name: String,
        message: String,
        error_message: String,
    },

    /// A dynamic value could not be assigned to the requested type.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// An environment setting could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}
