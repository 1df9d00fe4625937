//! Page containers: the materialized tree for one API record, and the
//! collection type produced for list responses.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::content::collection::ContentFieldCollection;
use crate::content::field::ContentField;

/// Metadata keys consumed by pagination handling; they never pass through
/// into a collection's generic metadata.
static RESERVED_METADATA_KEYS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["total_results", "limit", "results", "page"].into());

/// One materialized record: a content-type reference plus its top-level
/// fields. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    content_type: String,
    content: ContentFieldCollection,
}

impl Page {
    pub fn new(content_type: impl Into<String>, content: ContentFieldCollection) -> Self {
        Self {
            content_type: content_type.into(),
            content,
        }
    }

    /// The name of the content type this page was materialized against.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &ContentFieldCollection {
        &self.content
    }

    /// Named lookup into the page's top-level fields.
    pub fn field(&self, name: &str) -> Option<&ContentField> {
        self.content.get(name)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Pagination state attached to a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_results: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_results: u64) -> Self {
        Self {
            page,
            limit,
            total_results,
        }
    }

    /// Reads pagination out of a raw response object, tolerating missing or
    /// malformed entries.
    pub fn from_value(value: &Value) -> Self {
        Self {
            page: read_u64(value, "page") as u32,
            limit: read_u64(value, "limit") as u32,
            total_results: read_u64(value, "total_results"),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total_results.div_ceil(self.limit as u64)
    }
}

fn read_u64(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or_default()
}

/// Insertion-ordered metadata attached to a list response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    order: Vec<String>,
    entries: std::collections::HashMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Reserved pagination keys are refused and reported by
    /// the return value.
    pub fn add(&mut self, key: &str, value: Value) -> bool {
        if Self::is_reserved(key) {
            return false;
        }
        if !self.entries.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.entries.insert(key.to_string(), value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .map(|key| (key.as_str(), &self.entries[key]))
    }

    pub fn is_reserved(key: &str) -> bool {
        RESERVED_METADATA_KEYS.contains(key)
    }
}

/// The materialized form of a list response: pages in response order plus
/// pagination and pass-through metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCollection {
    pages: Vec<Page>,
    pagination: Pagination,
    metadata: Metadata,
}

impl PageCollection {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pages: Vec::new(),
            pagination,
            metadata: Metadata::new(),
        }
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
