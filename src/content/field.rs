//! Typed content-field nodes.
//!
//! [`ContentField`] is the closed union of every field kind the content
//! model can declare. Each variant carries the originating field name and a
//! type-specific payload. Leaf constructors coerce the raw value into the
//! payload and fail with a [`FieldError`] when the value cannot be read as
//! the declared type; composite variants are assembled by the materializer.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::content::collection::ContentFieldCollection;
use crate::errors::{json_type_name, FieldError};

#[derive(Debug, Clone, PartialEq)]
pub enum ContentField {
    Number {
        name: String,
        value: f64,
    },
    Text {
        name: String,
        value: String,
    },
    PlainText {
        name: String,
        value: String,
    },
    RichText {
        name: String,
        value: String,
    },
    Date {
        name: String,
        value: NaiveDate,
    },
    DateTime {
        name: String,
        value: DateTime<FixedOffset>,
    },
    Boolean {
        name: String,
        value: bool,
    },
    /// One collection per raw data row, in row order.
    Array {
        name: String,
        rows: Vec<ContentFieldCollection>,
    },
    Image {
        name: String,
        asset: AssetPayload,
    },
    Asset {
        name: String,
        asset: AssetPayload,
    },
    Audio {
        name: String,
        asset: AssetPayload,
    },
    Video {
        name: String,
        asset: AssetPayload,
    },
    Document {
        name: String,
        asset: AssetPayload,
    },
    /// A reference to another record, kept verbatim for the caller to
    /// resolve.
    Relation {
        name: String,
        reference: Value,
    },
    Component {
        name: String,
        fields: ContentFieldCollection,
    },
    FlexibleContent {
        name: String,
        rows: Vec<ContentFieldCollection>,
    },
}

impl ContentField {
    /// The name of the schema field this node was materialized from.
    pub fn name(&self) -> &str {
        match self {
            Self::Number { name, .. }
            | Self::Text { name, .. }
            | Self::PlainText { name, .. }
            | Self::RichText { name, .. }
            | Self::Date { name, .. }
            | Self::DateTime { name, .. }
            | Self::Boolean { name, .. }
            | Self::Array { name, .. }
            | Self::Image { name, .. }
            | Self::Asset { name, .. }
            | Self::Audio { name, .. }
            | Self::Video { name, .. }
            | Self::Document { name, .. }
            | Self::Relation { name, .. }
            | Self::Component { name, .. }
            | Self::FlexibleContent { name, .. } => name,
        }
    }

    /// The taxonomy name of this node's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::Text { .. } => "text",
            Self::PlainText { .. } => "plaintext",
            Self::RichText { .. } => "richtext",
            Self::Date { .. } => "date",
            Self::DateTime { .. } => "datetime",
            Self::Boolean { .. } => "boolean",
            Self::Array { .. } => "array",
            Self::Image { .. } => "image",
            Self::Asset { .. } => "asset",
            Self::Audio { .. } => "audio",
            Self::Video { .. } => "video",
            Self::Document { .. } => "document",
            Self::Relation { .. } => "relation",
            Self::Component { .. } => "component",
            Self::FlexibleContent { .. } => "flexible_content",
        }
    }

    // ------------------------------------------------------------------
    // Leaf constructors
    // ------------------------------------------------------------------

    pub fn number(name: &str, value: &Value) -> Result<Self, FieldError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| FieldError::InvalidNumber {
                value: n.to_string(),
            })?,
            Value::String(s) => s.parse::<f64>().map_err(|_| FieldError::InvalidNumber {
                value: s.clone(),
            })?,
            other => {
                return Err(FieldError::Type {
                    expected: "number",
                    actual: json_type_name(other),
                })
            }
        };
        Ok(Self::Number {
            name: name.to_string(),
            value: parsed,
        })
    }

    pub fn text(name: &str, value: &Value) -> Result<Self, FieldError> {
        Ok(Self::Text {
            name: name.to_string(),
            value: coerce_string(value)?,
        })
    }

    pub fn plain_text(name: &str, value: &Value) -> Result<Self, FieldError> {
        Ok(Self::PlainText {
            name: name.to_string(),
            value: coerce_string(value)?,
        })
    }

    pub fn rich_text(name: &str, value: &Value) -> Result<Self, FieldError> {
        Ok(Self::RichText {
            name: name.to_string(),
            value: coerce_string(value)?,
        })
    }

    pub fn date(name: &str, value: &Value) -> Result<Self, FieldError> {
        let Value::String(raw) = value else {
            return Err(FieldError::Type {
                expected: "date string",
                actual: json_type_name(value),
            });
        };
        let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
            .map_err(|_| FieldError::InvalidDate { value: raw.clone() })?;
        Ok(Self::Date {
            name: name.to_string(),
            value: parsed,
        })
    }

    pub fn datetime(name: &str, value: &Value) -> Result<Self, FieldError> {
        let Value::String(raw) = value else {
            return Err(FieldError::Type {
                expected: "datetime string",
                actual: json_type_name(value),
            });
        };
        let parsed = DateTime::parse_from_rfc3339(raw)
            .or_else(|_| {
                // Bare timestamps are read as UTC.
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .map(|naive| naive.and_utc().fixed_offset())
            })
            .map_err(|_| FieldError::InvalidDateTime { value: raw.clone() })?;
        Ok(Self::DateTime {
            name: name.to_string(),
            value: parsed,
        })
    }

    pub fn boolean(name: &str, value: &Value) -> Result<Self, FieldError> {
        let parsed = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" | "" => false,
                _ => return Err(FieldError::InvalidBoolean { value: s.clone() }),
            },
            other => {
                return Err(FieldError::Type {
                    expected: "boolean",
                    actual: json_type_name(other),
                })
            }
        };
        Ok(Self::Boolean {
            name: name.to_string(),
            value: parsed,
        })
    }

    pub fn image(name: &str, value: &Value) -> Self {
        Self::Image {
            name: name.to_string(),
            asset: AssetPayload::new(value),
        }
    }

    pub fn asset(name: &str, value: &Value) -> Self {
        Self::Asset {
            name: name.to_string(),
            asset: AssetPayload::new(value),
        }
    }

    pub fn audio(name: &str, value: &Value) -> Self {
        Self::Audio {
            name: name.to_string(),
            asset: AssetPayload::new(value),
        }
    }

    pub fn video(name: &str, value: &Value) -> Self {
        Self::Video {
            name: name.to_string(),
            asset: AssetPayload::new(value),
        }
    }

    pub fn document(name: &str, value: &Value) -> Self {
        Self::Document {
            name: name.to_string(),
            asset: AssetPayload::new(value),
        }
    }

    pub fn relation(name: &str, value: &Value) -> Self {
        Self::Relation {
            name: name.to_string(),
            reference: value.clone(),
        }
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { value, .. } => write!(f, "{}", value),
            Self::Text { value, .. }
            | Self::PlainText { value, .. }
            | Self::RichText { value, .. } => write!(f, "{}", value),
            Self::Date { value, .. } => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::DateTime { value, .. } => write!(f, "{}", value.to_rfc3339()),
            Self::Boolean { value, .. } => write!(f, "{}", value),
            Self::Array { rows, .. } | Self::FlexibleContent { rows, .. } => {
                let rendered: Vec<String> = rows.iter().map(|row| row.to_string()).collect();
                write!(f, "{}", rendered.join(" "))
            }
            Self::Image { asset, .. }
            | Self::Asset { asset, .. }
            | Self::Audio { asset, .. }
            | Self::Video { asset, .. }
            | Self::Document { asset, .. } => write!(f, "{}", asset.url().unwrap_or_default()),
            Self::Relation { reference, .. } => {
                write!(f, "{}", reference.as_str().unwrap_or_default())
            }
            Self::Component { fields, .. } => write!(f, "{}", fields),
        }
    }
}

/// Coerces a scalar raw value into text. Sequences and objects cannot be
/// rendered inline and are constructor failures.
fn coerce_string(value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(FieldError::Type {
            expected: "scalar",
            actual: json_type_name(other),
        }),
    }
}

/// Raw asset metadata, kept verbatim. Accessors read the conventional keys
/// leniently and return `None` when the payload does not carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPayload {
    value: Value,
}

impl AssetPayload {
    pub fn new(value: &Value) -> Self {
        Self {
            value: value.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    pub fn filesize(&self) -> Option<u64> {
        self.get("filesize").and_then(Value::as_u64)
    }

    /// The raw payload as handed over by the API.
    pub fn raw(&self) -> &Value {
        &self.value
    }
}
