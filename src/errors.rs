//! Unified error handling for content materialization.
//!
//! Every failure the crate can surface is a [`ContentError`]. Leaf node
//! constructors report the narrower [`FieldError`], which the materializer
//! wraps exactly once into [`ContentError::Field`] together with the field
//! name, its declared type, a dump of the offending raw value, and the
//! rendered parse trace. Structural mismatches (unknown field type, missing
//! key, non-sequence payload for a composite field) are not errors at all;
//! those fields are silently dropped.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// The single error type surfaced by this crate.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A content type must be selected before materializing records.
    #[error("content type is not set")]
    ContentTypeNotSet,

    /// The requested content type does not exist in the content model.
    #[error("content type '{name}' is not defined in the content model")]
    UnknownContentType { name: String },

    /// The requested field does not exist on the selected content type.
    #[error("content field '{name}' is not defined for this content type")]
    ContentFieldNotSet { name: String },

    /// A field node constructor failed somewhere in the recursive descent.
    /// Aborts materialization of the whole record.
    #[error("error when creating content field '{name}' (type: {field_type}) for value: {content}")]
    Field {
        name: String,
        field_type: String,
        content: String,
        /// Rendered parse-trace breadcrumb from the root schema type down
        /// to the offending field.
        trace: String,
        #[source]
        source: FieldError,
    },

    /// The content model document could not be parsed.
    #[error("failed to parse content model document")]
    ModelParse(#[from] serde_yaml::Error),

    /// The content model violated a structural invariant.
    #[error("invalid content model: {message}")]
    Schema { message: String },

    /// A menu cursor was moved to a position that is not occupied.
    #[error("invalid seek position: {position} (collection holds {len} items)")]
    InvalidSeekPosition { position: usize, len: usize },
}

impl ContentError {
    /// Stable error-code suffix for diagnostics and test assertions.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::ContentTypeNotSet => "content_type_not_set",
            Self::UnknownContentType { .. } => "unknown_content_type",
            Self::ContentFieldNotSet { .. } => "content_field_not_set",
            Self::Field { .. } => "field",
            Self::ModelParse(_) => "model_parse",
            Self::Schema { .. } => "schema",
            Self::InvalidSeekPosition { .. } => "invalid_seek_position",
        }
    }
}

impl Diagnostic for ContentError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let area = match self {
            Self::ContentTypeNotSet
            | Self::UnknownContentType { .. }
            | Self::ContentFieldNotSet { .. } => "model",
            Self::Field { .. } => "materialize",
            Self::ModelParse(_) | Self::Schema { .. } => "schema",
            Self::InvalidSeekPosition { .. } => "menu",
        };
        Some(Box::new(format!(
            "fieldstone::{}::{}",
            area,
            self.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Self::ContentTypeNotSet => Some(Box::new(
                "select a content type with set_content_type() before materializing records",
            )),
            // The breadcrumb locates the failure inside nested structures.
            Self::Field { trace, .. } => Some(Box::new(trace)),
            _ => None,
        }
    }
}

/// Failures raised by leaf field-node constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("expected {expected}, got {actual}")]
    Type {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{value}' is not a valid number")]
    InvalidNumber { value: String },

    #[error("'{value}' is not a valid date")]
    InvalidDate { value: String },

    #[error("'{value}' is not a valid datetime")]
    InvalidDateTime { value: String },

    #[error("'{value}' is not a valid boolean")]
    InvalidBoolean { value: String },
}

/// Returns the JSON type name of a raw value, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
