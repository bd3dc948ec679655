//! List envelopes whose element type is chosen at runtime.
//!
//! Some callers only learn the item type of a response from a descriptor,
//! e.g. a schema looked up by name. [`ListType`] describes the payload of
//! the envelope they need, [`cast_list`] turns untyped JSON items into a
//! typed [`DynList`], and [`cast_list_as_service_response`] packs the result
//! into the matching [`ListResponse`] variant.
//!
//! The set of element kinds is closed; each kind maps to one concrete
//! `Envelope<Vec<_>>`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{Envelope, ResponseMeta};
use crate::error::EnvelopeError;
use crate::response::ServiceResponse;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// ElementKind
// ---------------------------------------------------------------------------

/// Item types supported by dynamically built lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Bool,
    Integer,
    Float,
    Text,
    /// RFC 3339 strings parsed into UTC timestamps.
    Timestamp,
    /// Arbitrary JSON, accepted as-is.
    Json,
}

impl ElementKind {
    /// Rust type an item of this kind is stored as.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::Text => "String",
            Self::Timestamp => "Timestamp",
            Self::Json => "Value",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// ---------------------------------------------------------------------------
// ListType
// ---------------------------------------------------------------------------

/// Runtime descriptor of an envelope payload type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", content = "element", rename_all = "snake_case")]
pub enum ListType {
    /// A single value; carries no element type parameter.
    Scalar(ElementKind),
    /// A sequence of the given element kind.
    List(ElementKind),
}

impl ListType {
    /// Element type parameter, if the descriptor has one.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            Self::List(kind) => Some(*kind),
            Self::Scalar(_) => None,
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::List(kind) => write!(f, "Vec<{kind}>"),
        }
    }
}

// ---------------------------------------------------------------------------
// DynList
// ---------------------------------------------------------------------------

/// A typed list whose element kind was chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DynList {
    Bool(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
    Timestamp(Vec<Timestamp>),
    Json(Vec<Value>),
}

impl DynList {
    /// An empty list of the given kind.
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Bool => Self::Bool(Vec::new()),
            ElementKind::Integer => Self::Integer(Vec::new()),
            ElementKind::Float => Self::Float(Vec::new()),
            ElementKind::Text => Self::Text(Vec::new()),
            ElementKind::Timestamp => Self::Timestamp(Vec::new()),
            ElementKind::Json => Self::Json(Vec::new()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Bool(_) => ElementKind::Bool,
            Self::Integer(_) => ElementKind::Integer,
            Self::Float(_) => ElementKind::Float,
            Self::Text(_) => ElementKind::Text,
            Self::Timestamp(_) => ElementKind::Timestamp,
            Self::Json(_) => ElementKind::Json,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bool(items) => items.len(),
            Self::Integer(items) => items.len(),
            Self::Float(items) => items.len(),
            Self::Text(items) => items.len(),
            Self::Timestamp(items) => items.len(),
            Self::Json(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an untyped item, checking it is assignable to the list's kind.
    ///
    /// Integers are accepted by `Float` lists; nothing else is converted.
    pub fn push(&mut self, item: Value) -> Result<(), EnvelopeError> {
        let kind = self.kind();
        let index = self.len();
        let mismatch = |item: &Value| {
            EnvelopeError::TypeMismatch(format!(
                "item {index} ({item}) is not assignable to {kind}"
            ))
        };

        match self {
            Self::Bool(items) => items.push(item.as_bool().ok_or_else(|| mismatch(&item))?),
            Self::Integer(items) => items.push(item.as_i64().ok_or_else(|| mismatch(&item))?),
            Self::Float(items) => items.push(item.as_f64().ok_or_else(|| mismatch(&item))?),
            Self::Text(items) => match item {
                Value::String(text) => items.push(text),
                other => return Err(mismatch(&other)),
            },
            Self::Timestamp(items) => {
                let parsed = item
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .ok_or_else(|| mismatch(&item))?;
                items.push(parsed.with_timezone(&Utc));
            }
            Self::Json(items) => items.push(item),
        }
        Ok(())
    }

    /// Convert back into a JSON array.
    pub fn into_json(self) -> Value {
        let items: Vec<Value> = match self {
            Self::Bool(items) => items.into_iter().map(Value::from).collect(),
            Self::Integer(items) => items.into_iter().map(Value::from).collect(),
            Self::Float(items) => items.into_iter().map(Value::from).collect(),
            Self::Text(items) => items.into_iter().map(Value::from).collect(),
            Self::Timestamp(items) => items
                .into_iter()
                .map(|ts| Value::from(ts.to_rfc3339()))
                .collect(),
            Self::Json(items) => items,
        };
        Value::Array(items)
    }
}

/// Copy every untyped item into a new list of `kind`.
///
/// Fails with [`EnvelopeError::TypeMismatch`] on the first item that is not
/// assignable to `kind`.
pub fn cast_list<I>(kind: ElementKind, items: I) -> Result<DynList, EnvelopeError>
where
    I: IntoIterator<Item = Value>,
{
    let mut list = DynList::empty(kind);
    for item in items {
        list.push(item)?;
    }
    Ok(list)
}

// ---------------------------------------------------------------------------
// ListResponse
// ---------------------------------------------------------------------------

/// An envelope over one of the supported list types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListResponse {
    Bool(Envelope<Vec<bool>>),
    Integer(Envelope<Vec<i64>>),
    Float(Envelope<Vec<f64>>),
    Text(Envelope<Vec<String>>),
    Timestamp(Envelope<Vec<Timestamp>>),
    Json(Envelope<Vec<Value>>),
}

/// Evaluate `$body` against the envelope inside any `ListResponse` variant.
macro_rules! with_envelope {
    ($response:expr, $envelope:ident => $body:expr) => {
        match $response {
            ListResponse::Bool($envelope) => $body,
            ListResponse::Integer($envelope) => $body,
            ListResponse::Float($envelope) => $body,
            ListResponse::Text($envelope) => $body,
            ListResponse::Timestamp($envelope) => $body,
            ListResponse::Json($envelope) => $body,
        }
    };
}

impl ListResponse {
    /// An envelope of the given kind with no data.
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Bool => Self::Bool(Envelope::default()),
            ElementKind::Integer => Self::Integer(Envelope::default()),
            ElementKind::Float => Self::Float(Envelope::default()),
            ElementKind::Text => Self::Text(Envelope::default()),
            ElementKind::Timestamp => Self::Timestamp(Envelope::default()),
            ElementKind::Json => Self::Json(Envelope::default()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Bool(_) => ElementKind::Bool,
            Self::Integer(_) => ElementKind::Integer,
            Self::Float(_) => ElementKind::Float,
            Self::Text(_) => ElementKind::Text,
            Self::Timestamp(_) => ElementKind::Timestamp,
            Self::Json(_) => ElementKind::Json,
        }
    }

    /// Take the payload out as a [`DynList`], if one is set.
    pub fn into_data(self) -> Option<DynList> {
        match self {
            Self::Bool(envelope) => envelope.data.map(DynList::Bool),
            Self::Integer(envelope) => envelope.data.map(DynList::Integer),
            Self::Float(envelope) => envelope.data.map(DynList::Float),
            Self::Text(envelope) => envelope.data.map(DynList::Text),
            Self::Timestamp(envelope) => envelope.data.map(DynList::Timestamp),
            Self::Json(envelope) => envelope.data.map(DynList::Json),
        }
    }
}

impl From<DynList> for ListResponse {
    /// Store an already typed list as the payload, with `amount` set to its
    /// length.
    fn from(list: DynList) -> Self {
        let amount = amount_for_len(list.len());
        match list {
            DynList::Bool(items) => Self::Bool(filled(items, amount)),
            DynList::Integer(items) => Self::Integer(filled(items, amount)),
            DynList::Float(items) => Self::Float(filled(items, amount)),
            DynList::Text(items) => Self::Text(filled(items, amount)),
            DynList::Timestamp(items) => Self::Timestamp(filled(items, amount)),
            DynList::Json(items) => Self::Json(filled(items, amount)),
        }
    }
}

fn filled<T>(items: Vec<T>, amount: i32) -> Envelope<Vec<T>> {
    Envelope {
        data: Some(items),
        meta: ResponseMeta {
            amount,
            ..ResponseMeta::default()
        },
    }
}

/// Page size for a list of `len` items. Saturates at `i32::MAX`.
fn amount_for_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl ServiceResponse for ListResponse {
    fn meta(&self) -> &ResponseMeta {
        with_envelope!(self, envelope => &envelope.meta)
    }

    fn meta_mut(&mut self) -> &mut ResponseMeta {
        with_envelope!(self, envelope => &mut envelope.meta)
    }

    fn has_data(&self) -> bool {
        with_envelope!(self, envelope => envelope.data.is_some())
    }

    fn set_data(&mut self, data: Value) -> Result<(), EnvelopeError> {
        with_envelope!(self, envelope => envelope.set_data(data))
    }
}

/// Build a list envelope for a payload type known only at runtime.
///
/// The element kind comes from `list_type`; every item is cast into a typed
/// list which becomes the payload of a fresh envelope, and `amount` is set
/// to the number of items.
pub fn cast_list_as_service_response<I>(
    list_type: &ListType,
    items: I,
) -> Result<ListResponse, EnvelopeError>
where
    I: IntoIterator<Item = Value>,
{
    let kind = list_type.element_kind().ok_or_else(|| {
        EnvelopeError::TypeMismatch(format!("{list_type} has no element type parameter"))
    })?;

    let response = ListResponse::from(cast_list(kind, items)?);

    tracing::debug!(
        element_kind = %kind,
        amount = response.amount(),
        "Built dynamic list response"
    );
    Ok(response)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
