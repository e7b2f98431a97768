//! Alphabetically sorted set of strings, the value type for tag collections.

use std::fmt;

/// Separator used when a set is serialized.
pub const ELEMENT_SEPARATOR: char = ',';

/// A deduplicated set of strings, always kept in ascending order.
///
/// Sets are small (a handful of tags per file), so storage is a sorted `Vec`
/// and lookups are binary searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortedSet {
    data: Vec<String>,
}

impl SortedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from the given elements, dropping duplicates
    pub fn from_elements<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data: Vec<String> = elements.into_iter().map(Into::into).collect();
        data.sort();
        data.dedup();
        Self { data }
    }

    /// Add an element. Adding an element that is already present does nothing.
    pub fn add(&mut self, element: impl Into<String>) {
        let element = element.into();
        if let Err(pos) = self.data.binary_search(&element) {
            self.data.insert(pos, element);
        }
    }

    /// Remove an element if present. Returns true if the set is now empty.
    pub fn delete(&mut self, element: &str) -> bool {
        if let Ok(pos) = self.position(element) {
            self.data.remove(pos);
        }
        self.data.is_empty()
    }

    pub fn contains(&self, element: &str) -> bool {
        self.position(element).is_ok()
    }

    /// True if every element of `search` is in the set (vacuously true for an
    /// empty search).
    pub fn contains_all<S: AsRef<str>>(&self, search: &[S]) -> bool {
        search.iter().all(|s| self.contains(s.as_ref()))
    }

    /// True if at least one element of `search` is in the set.
    pub fn contains_any<S: AsRef<str>>(&self, search: &[S]) -> bool {
        search.iter().any(|s| self.contains(s.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements joined by `,` in sorted order; the empty set serializes to "".
    pub fn serialize(&self) -> String {
        self.data.join(&ELEMENT_SEPARATOR.to_string())
    }

    /// Owned copy of the elements in sorted order
    pub fn to_vec(&self) -> Vec<String> {
        self.data.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.data.iter()
    }

    fn position(&self, element: &str) -> Result<usize, usize> {
        self.data.binary_search_by(|e| e.as_str().cmp(element))
    }
}

impl fmt::Display for SortedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<S: Into<String>> FromIterator<S> for SortedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_elements(iter)
    }
}

impl<S: Into<String>> Extend<S> for SortedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<'a> IntoIterator for &'a SortedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
