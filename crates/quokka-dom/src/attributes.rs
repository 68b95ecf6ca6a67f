//! Ordered element attributes.
//!
//! [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
//!
//! "An element has an associated attribute list" — a *list*, not a map:
//! attribute order is author order and must survive a parse/serialise
//! round trip byte for byte. Lookup is ASCII-case-insensitive; the parser
//! lowercases keys before they get here, but documents built by hand may
//! carry mixed-case names.

use core::fmt;

/// A single name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// Ordered, unique-keyed attribute collection.
///
/// Keys are unique under ASCII-case-insensitive comparison. Insertion
/// order is preserved; re-inserting an existing key updates the value in
/// place without moving the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// True if an attribute with this name (ASCII-case-insensitive) exists.
    #[must_use]
    pub fn has_key(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Value for the named attribute, or `None` if absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index_of(name)
            .map(|i| self.entries[i].value.as_str())
    }

    /// Insert or update an attribute. Updating keeps the entry's position.
    pub fn put(&mut self, name: &str, value: &str) {
        match self.index_of(name) {
            Some(i) => self.entries[i].value = value.to_string(),
            None => self
                .entries
                .push(Attribute::new(name.to_string(), value.to_string())),
        }
    }

    /// Insert only if the key is not already present.
    ///
    /// The tree builder uses this when merging attributes from duplicate
    /// `<html>`/`<body>` start tags: the first occurrence wins.
    pub fn put_if_absent(&mut self, name: &str, value: &str) {
        if !self.has_key(name) {
            self.entries
                .push(Attribute::new(name.to_string(), value.to_string()));
        }
    }

    /// Remove the named attribute if present.
    pub fn remove(&mut self, name: &str) {
        if let Some(i) = self.index_of(name) {
            let _ = self.entries.remove(i);
        }
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Attribute> for Attributes {
    /// Collect attributes, keeping the first occurrence of duplicate keys.
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for attr in iter {
            attrs.put_if_absent(&attr.name, &attr.value);
        }
        attrs
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.entries {
            write!(f, " {}=\"{}\"", attr.name, attr.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Attributes;

    #[test]
    fn put_preserves_insertion_order() {
        let mut attrs = Attributes::new();
        attrs.put("href", "/a");
        attrs.put("class", "x");
        attrs.put("id", "y");
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["href", "class", "id"]);
    }

    #[test]
    fn put_updates_in_place() {
        let mut attrs = Attributes::new();
        attrs.put("href", "/a");
        attrs.put("class", "x");
        attrs.put("href", "/b");
        assert_eq!(attrs.get("href"), Some("/b"));
        let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["href", "class"]);
    }

    #[test]
    fn lookup_is_ascii_case_insensitive() {
        let mut attrs = Attributes::new();
        attrs.put("href", "/a");
        assert!(attrs.has_key("HREF"));
        assert_eq!(attrs.get("HrEf"), Some("/a"));
    }

    #[test]
    fn put_if_absent_keeps_first() {
        let mut attrs = Attributes::new();
        attrs.put_if_absent("id", "first");
        attrs.put_if_absent("ID", "second");
        assert_eq!(attrs.get("id"), Some("first"));
        assert_eq!(attrs.len(), 1);
    }
}
