//! Service response envelopes for REST client calls.
//!
//! An [`Envelope`] carries the payload returned by a remote call together
//! with pagination, timing and error metadata. The helpers in this crate
//! build envelopes ([`Envelope::wrap`]), re-type them along a call chain
//! ([`Envelope::retype`]), unwrap them at the terminal consumer
//! ([`get_data`]) and build list envelopes whose element type is only known
//! at runtime ([`cast_list_as_service_response`]).

pub mod config;
pub mod dynamic;
pub mod envelope;
pub mod error;
pub mod observable;
pub mod response;
pub mod status;
pub mod types;
pub mod unwrap;

pub use config::EnvelopeConfig;
pub use dynamic::{
    cast_list, cast_list_as_service_response, DynList, ElementKind, ListResponse, ListType,
};
pub use envelope::{Envelope, IntoEnvelope, ResponseMeta, WrapOptions};
pub use error::EnvelopeError;
pub use observable::{ErrorList, ListChange};
pub use response::ServiceResponse;
pub use status::{ServiceErrorType, ServiceStatus};
pub use unwrap::{get_data, UnwrapPolicy};
