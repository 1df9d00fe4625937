//! fieldstone: schema-driven content materialization for headless CMS
//! front-ends.
//!
//! Given a raw record from a content API and a declarative content model,
//! the [`Materializer`] produces a strongly-typed, ordered tree of content
//! fields ready for rendering. Structural mismatches drop individual
//! fields; genuine construction failures abort the whole record with one
//! diagnostic that carries the full parse trace.

pub use crate::content::{
    AssetPayload, ContentField, ContentFieldCollection, Metadata, Page, PageCollection, Pagination,
};
pub use crate::errors::{ContentError, FieldError};
pub use crate::materializer::Materializer;
pub use crate::menus::{MenuItem, MenuItemCollection};
pub use crate::schema::{ContentModel, ContentType, Field, FieldType};
pub use crate::trace::ParseTrace;

pub mod cache;
pub mod content;
pub mod errors;
pub mod materializer;
pub mod menus;
pub mod schema;
pub mod trace;
