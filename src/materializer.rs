//! The recursive field materializer.
//!
//! Walks a content type's field definitions against a raw API record and
//! produces the typed, ordered field tree for that record. Dispatch is a
//! match over the closed [`FieldType`] union; composite types recurse with
//! a fresh [`ParseTrace`] frame per nesting level.
//!
//! ## Failure model
//!
//! Two very different things can go wrong, and they are handled
//! differently:
//!
//! - Structural mismatches are absorbed locally. An unrecognized field
//!   type, a key missing from the raw data, or a non-sequence value handed
//!   to a composite field all drop that one field and nothing else.
//! - A leaf constructor failure anywhere in the descent aborts the whole
//!   record. It is wrapped exactly once into [`ContentError::Field`],
//!   carrying the offending field's name, declared type, a dump of the raw
//!   value, and the rendered trace breadcrumb, with the constructor failure
//!   attached as source. Callers either get a fully populated [`Page`] or
//!   that one diagnostic; there is no partial record.

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::content::collection::ContentFieldCollection;
use crate::content::field::ContentField;
use crate::content::page::{Page, PageCollection, Pagination};
use crate::errors::{ContentError, FieldError};
use crate::schema::{ContentModel, ContentType, Field, FieldType};
use crate::trace::{dump, ParseTrace};

/// Materializes raw API records against a content model.
pub struct Materializer {
    model: ContentModel,
    content_type: Option<String>,
}

impl Materializer {
    pub fn new(model: ContentModel) -> Self {
        Self {
            model,
            content_type: None,
        }
    }

    pub fn model(&self) -> &ContentModel {
        &self.model
    }

    /// Selects the content type that subsequent records are materialized
    /// against.
    pub fn set_content_type(&mut self, name: &str) -> Result<(), ContentError> {
        if !self.model.has_content_type(name) {
            return Err(ContentError::UnknownContentType {
                name: name.to_string(),
            });
        }
        self.content_type = Some(name.to_string());
        Ok(())
    }

    pub fn has_content_type(&self) -> bool {
        self.content_type.is_some()
    }

    /// The selected content type. Calling this before [`set_content_type`]
    /// is a precondition error.
    ///
    /// [`set_content_type`]: Self::set_content_type
    pub fn content_type(&self) -> Result<&ContentType, ContentError> {
        let name = self
            .content_type
            .as_deref()
            .ok_or(ContentError::ContentTypeNotSet)?;
        // set_content_type verified membership.
        self.model
            .content_type(name)
            .ok_or(ContentError::ContentTypeNotSet)
    }

    /// Materializes one raw record into a [`Page`].
    ///
    /// Fields are processed in declared order; keys missing from the record
    /// are skipped and produce no entry.
    pub fn create_page(&self, data: &Value) -> Result<Page, ContentError> {
        let content_type = self.content_type()?;
        debug!(content_type = %content_type.name, "materializing record");

        let mut content = ContentFieldCollection::new();
        if let Some(record) = data.as_object() {
            let mut root = ParseTrace::new(&content_type.name);
            self.populate(&mut content, &content_type.fields, record, &mut root)?;
        }
        Ok(Page::new(&content_type.name, content))
    }

    /// Materializes an already-fetched list response body into a
    /// [`PageCollection`]: one page per `data` entry, pagination read from
    /// `pagination`, and every non-reserved `metadata` entry passed through.
    pub fn create_pages(&self, body: &Value) -> Result<PageCollection, ContentError> {
        let pagination = body
            .get("pagination")
            .map(Pagination::from_value)
            .unwrap_or_default();
        let mut pages = PageCollection::new(pagination);

        if let Some(records) = body.get("data").and_then(Value::as_array) {
            for record in records {
                pages.add_page(self.create_page(record)?);
            }
        }

        if let Some(metadata) = body.get("metadata").and_then(Value::as_object) {
            for (key, value) in metadata {
                pages.metadata_mut().add(key, value.clone());
            }
        }

        debug!(pages = pages.len(), "materialized list response");
        Ok(pages)
    }

    /// Materializes the fields present in `record` into `collection`,
    /// recording each on the current trace frame before dispatch.
    fn populate<'t>(
        &self,
        collection: &mut ContentFieldCollection,
        fields: &[Field],
        record: &'t Map<String, Value>,
        frame: &mut ParseTrace<'t>,
    ) -> Result<(), ContentError> {
        for field in fields {
            let Some(value) = record.get(&field.name) else {
                continue;
            };
            frame.record(&field.name, field.field_type.as_str(), value);
            if let Some(node) = self.content_field(field, value, frame)? {
                collection.add(node);
            }
        }
        Ok(())
    }

    /// Returns a content field populated with the passed raw value, or
    /// `None` when the field is to be dropped (unrecognized type, or a
    /// composite field whose value has the wrong shape).
    pub fn content_field<'t>(
        &self,
        field: &Field,
        value: &'t Value,
        frame: &ParseTrace<'t>,
    ) -> Result<Option<ContentField>, ContentError> {
        trace!(field = %field.name, field_type = %field.field_type, "materializing field");
        let node = match &field.field_type {
            FieldType::Number => self.leaf(ContentField::number(&field.name, value), field, value, frame)?,
            FieldType::Text => self.leaf(ContentField::text(&field.name, value), field, value, frame)?,
            FieldType::PlainText => {
                self.leaf(ContentField::plain_text(&field.name, value), field, value, frame)?
            }
            FieldType::RichText => {
                self.leaf(ContentField::rich_text(&field.name, value), field, value, frame)?
            }
            FieldType::Date => self.leaf(ContentField::date(&field.name, value), field, value, frame)?,
            FieldType::DateTime => {
                self.leaf(ContentField::datetime(&field.name, value), field, value, frame)?
            }
            FieldType::Boolean => {
                self.leaf(ContentField::boolean(&field.name, value), field, value, frame)?
            }
            FieldType::Image => ContentField::image(&field.name, value),
            FieldType::Asset => ContentField::asset(&field.name, value),
            FieldType::Audio => ContentField::audio(&field.name, value),
            FieldType::Video => ContentField::video(&field.name, value),
            FieldType::Document => ContentField::document(&field.name, value),
            FieldType::Relation => ContentField::relation(&field.name, value),
            FieldType::Array => match self.rows(field, value, frame)? {
                Some(rows) => ContentField::Array {
                    name: field.name.clone(),
                    rows,
                },
                None => return Ok(None),
            },
            FieldType::FlexibleContent => match self.rows(field, value, frame)? {
                Some(rows) => ContentField::FlexibleContent {
                    name: field.name.clone(),
                    rows,
                },
                None => return Ok(None),
            },
            FieldType::Component => {
                let Some(record) = value.as_object() else {
                    warn!(
                        field = %field.name,
                        "dropping component field: value is not an object"
                    );
                    return Ok(None);
                };
                let mut child = ParseTrace::nested(&field.name, frame);
                child.record(&field.name, field.field_type.as_str(), value);
                let mut fields = ContentFieldCollection::new();
                self.populate(&mut fields, &field.children, record, &mut child)?;
                ContentField::Component {
                    name: field.name.clone(),
                    fields,
                }
            }
            FieldType::Unknown(type_name) => {
                warn!(field = %field.name, field_type = %type_name, "dropping field of unrecognized type");
                return Ok(None);
            }
        };
        Ok(Some(node))
    }

    /// Materializes the rows of an array-like field: one collection per raw
    /// row, children matched by key, missing keys skipped. A non-sequence
    /// value drops the whole field.
    fn rows<'t>(
        &self,
        field: &Field,
        value: &'t Value,
        frame: &ParseTrace<'t>,
    ) -> Result<Option<Vec<ContentFieldCollection>>, ContentError> {
        let Some(raw_rows) = value.as_array() else {
            warn!(
                field = %field.name,
                field_type = %field.field_type,
                "dropping field: value is not a sequence"
            );
            return Ok(None);
        };

        let mut child = ParseTrace::nested(&field.name, frame);
        child.record(&field.name, field.field_type.as_str(), value);

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw_row in raw_rows {
            let mut row = ContentFieldCollection::new();
            if let Some(record) = raw_row.as_object() {
                self.populate(&mut row, &field.children, record, &mut child)?;
            }
            rows.push(row);
        }
        Ok(Some(rows))
    }

    /// Wraps a leaf-constructor failure into the single materialization
    /// diagnostic. The wrap happens exactly once, at the frame where the
    /// offending field was recorded; outer recursion levels propagate the
    /// diagnostic unchanged.
    fn leaf(
        &self,
        result: Result<ContentField, FieldError>,
        field: &Field,
        value: &Value,
        frame: &ParseTrace<'_>,
    ) -> Result<ContentField, ContentError> {
        result.map_err(|source| ContentError::Field {
            name: field.name.clone(),
            field_type: field.field_type.as_str().to_string(),
            content: dump(value),
            trace: frame.to_string(),
            source,
        })
    }
}
