//! Ordered, name-keyed container of content-field nodes.
//!
//! Iteration order is first-insertion order. Re-adding a field that already
//! exists replaces the node at its original position; it never moves to the
//! end. Implemented as an explicit key-order list paired with a
//! name-to-node map.

use std::collections::HashMap;
use std::fmt;

use crate::content::field::ContentField;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFieldCollection {
    order: Vec<String>,
    fields: HashMap<String, ContentField>,
}

impl ContentFieldCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `field` keyed by its name. An existing key keeps its
    /// position and only the node is replaced.
    pub fn add(&mut self, field: ContentField) {
        let name = field.name().to_string();
        if !self.fields.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.fields.insert(name, field);
    }

    /// Exact-name lookup. This is the single generic accessor; there are no
    /// per-field methods.
    pub fn get(&self, name: &str) -> Option<&ContentField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates nodes in insertion order. Every call starts a fresh pass
    /// from the first inserted key.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            order: self.order.iter(),
            fields: &self.fields,
        }
    }
}

pub struct Iter<'a> {
    order: std::slice::Iter<'a, String>,
    fields: &'a HashMap<String, ContentField>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ContentField;

    fn next(&mut self) -> Option<Self::Item> {
        // Every key in `order` has a node in `fields`.
        self.order.next().map(|name| &self.fields[name])
    }
}

impl<'a> IntoIterator for &'a ContentFieldCollection {
    type Item = &'a ContentField;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ContentFieldCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(|field| field.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}
