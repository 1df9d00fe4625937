//! Navigation menu trees.
//!
//! A [`MenuItemCollection`] is an ordered, seekable sequence of
//! [`MenuItem`]s, each of which may carry its own child collection to any
//! depth. The collection keeps an explicit cursor so templating code can
//! rewind, advance, and seek by position; [`set_base_urls`] rewrites URL
//! prefixes across the whole tree.
//!
//! [`set_base_urls`]: MenuItemCollection::set_base_urls

use crate::errors::ContentError;

/// One navigation entry: a label, a URL, and an optional child collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItem {
    label: String,
    url: String,
    children: MenuItemCollection,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            children: MenuItemCollection::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn children(&self) -> &MenuItemCollection {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut MenuItemCollection {
        &mut self.children
    }

    pub fn add_child(&mut self, child: MenuItem) {
        self.children.add_item(child);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Rewrites this item's URL by replacing a leading `old_url` prefix
    /// with `new_url`. URLs that do not start with `old_url` are left
    /// untouched.
    pub fn set_base_url(&mut self, old_url: &str, new_url: &str) {
        if let Some(rest) = self.url.strip_prefix(old_url) {
            self.url = format!("{}{}", new_url, rest);
        }
    }
}

/// Ordered collection of menu items with an explicit cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItemCollection {
    items: Vec<MenuItem>,
    position: usize,
}

impl MenuItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// The item under the cursor, or `None` when the cursor has advanced
    /// past the end.
    pub fn current(&self) -> Option<&MenuItem> {
        self.items.get(self.position)
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    /// The cursor's current position.
    pub fn key(&self) -> usize {
        self.position
    }

    pub fn valid(&self) -> bool {
        self.position < self.items.len()
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Moves the cursor to `position`, failing when that position is not
    /// occupied.
    pub fn seek(&mut self, position: usize) -> Result<(), ContentError> {
        if position >= self.items.len() {
            return Err(ContentError::InvalidSeekPosition {
                position,
                len: self.items.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuItem> {
        self.items.iter()
    }

    /// Rewrites URL prefixes across the whole tree. Each item's children
    /// are rewritten before the item itself.
    pub fn set_base_urls(&mut self, old_url: &str, new_url: &str) {
        for item in &mut self.items {
            item.children.set_base_urls(old_url, new_url);
            item.set_base_url(old_url, new_url);
        }
    }
}

impl<'a> IntoIterator for &'a MenuItemCollection {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
