//! The content model: a declarative description of every content type the
//! API can return, and of the fields each type carries.
//!
//! A model is usually loaded from a YAML document:
//!
//! ```yaml
//! content_types:
//!   - name: news
//!     api_endpoint: posts
//!     content_fields:
//!       - name: title
//!         type: text
//!       - name: team
//!         type: array
//!         content_fields:
//!           - name: member
//!             type: text
//! ```
//!
//! Field types are parsed once at this boundary into the closed
//! [`FieldType`] enum; the materializer never matches on strings.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ContentError;

/// The declared type of a content field.
///
/// Unrecognized type strings are preserved in [`FieldType::Unknown`] so the
/// materializer can drop such fields without failing model load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    Number,
    Text,
    PlainText,
    RichText,
    Date,
    DateTime,
    Boolean,
    Array,
    Image,
    Asset,
    Audio,
    Video,
    Document,
    Relation,
    Component,
    FlexibleContent,
    Unknown(String),
}

impl FieldType {
    /// The API taxonomy name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::PlainText => "plaintext",
            Self::RichText => "richtext",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Image => "image",
            Self::Asset => "asset",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
            Self::Relation => "relation",
            Self::Component => "component",
            Self::FlexibleContent => "flexible_content",
            Self::Unknown(name) => name,
        }
    }

    /// Composite types carry child field definitions and materialize into
    /// nested collections.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array | Self::Component | Self::FlexibleContent)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "number" => Self::Number,
            "text" => Self::Text,
            "plaintext" => Self::PlainText,
            "richtext" => Self::RichText,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "image" => Self::Image,
            "asset" => Self::Asset,
            "audio" => Self::Audio,
            "video" => Self::Video,
            "document" => Self::Document,
            "relation" => Self::Relation,
            "component" => Self::Component,
            "flexible_content" => Self::FlexibleContent,
            _ => Self::Unknown(name),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field definition: a name, a declared type, and (for composite types)
/// the child field definitions applied to each row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, rename = "content_fields")]
    pub children: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            children: Vec::new(),
        }
    }

    /// Builder-style helper for composing schemas in code.
    pub fn with_child(mut self, child: Field) -> Self {
        self.children.push(child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// A named content type: an ordered set of top-level field definitions plus
/// the API endpoint its records are fetched from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentType {
    pub name: String,
    #[serde(default)]
    pub api_endpoint: String,
    #[serde(default, rename = "content_fields")]
    pub fields: Vec<Field>,
}

impl ContentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_endpoint: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a field definition, failing with a precondition error when
    /// it is not part of this content type.
    pub fn field_required(&self, name: &str) -> Result<&Field, ContentError> {
        self.field(name).ok_or_else(|| ContentError::ContentFieldNotSet {
            name: name.to_string(),
        })
    }
}

/// The full content model for a site: every content type the front end can
/// materialize.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content_types: Vec<ContentType>,
}

impl ContentModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_types: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_types.push(content_type);
        self
    }

    /// Parses a content model from a YAML document and validates it.
    pub fn from_yaml(document: &str) -> Result<Self, ContentError> {
        let model: ContentModel = serde_yaml::from_str(document)?;
        model.validate()?;
        Ok(model)
    }

    /// Reads and parses a content model document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let document = fs::read_to_string(path.as_ref()).map_err(|e| ContentError::Schema {
            message: format!(
                "cannot read content model '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_yaml(&document)
    }

    pub fn content_type(&self, name: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|t| t.name == name)
    }

    pub fn has_content_type(&self, name: &str) -> bool {
        self.content_type(name).is_some()
    }

    /// Checks the structural invariants: content-type names are unique, and
    /// within any one field's children every name appears once.
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = Vec::new();
        for content_type in &self.content_types {
            if seen.contains(&&content_type.name) {
                return Err(ContentError::Schema {
                    message: format!("duplicate content type '{}'", content_type.name),
                });
            }
            seen.push(&content_type.name);
            validate_fields(&content_type.name, &content_type.fields)?;
        }
        Ok(())
    }
}

fn validate_fields(owner: &str, fields: &[Field]) -> Result<(), ContentError> {
    let mut seen = Vec::new();
    for field in fields {
        if seen.contains(&&field.name) {
            return Err(ContentError::Schema {
                message: format!("duplicate field '{}' under '{}'", field.name, owner),
            });
        }
        seen.push(&field.name);
        validate_fields(&field.name, &field.children)?;
    }
    Ok(())
}
