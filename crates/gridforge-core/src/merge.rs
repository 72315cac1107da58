//! Merge and overlay protocols for the document tree.
//!
//! Every model in the tree participates in up to three cross-cutting
//! behaviors:
//!
//! - [`Combine`]: a right-biased fallback merge. Reference values fill only
//!   fields that are still at their default; customized fields on the
//!   receiver are never overwritten. This models a style-inheritance chain
//!   where local settings win over inherited ones.
//! - [`ApplyOptions`]: a sparse overlay in the opposite direction. An
//!   options struct carries all-`Option` fields and overwrites exactly the
//!   fields that are present.
//! - [`Keyed`] + [`KeyedCollection`]: ordered, identity-keyed containers
//!   that reconcile with a reference collection by key union.
//!
//! # Example
//!
//! ```rust
//! use gridforge_core::{Combine, Font};
//!
//! let mut local = Font::default();
//! local.bold = true;
//!
//! let mut inherited = Font::default();
//! inherited.name = "Georgia".to_string();
//! inherited.italic = true;
//!
//! local.combine(&inherited);
//! assert!(local.bold);                  // local customization kept
//! assert_eq!(local.name, "Georgia");    // default filled from reference
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Combine
// ============================================================================

/// Right-biased fallback merge.
///
/// `combine` mutates the receiver in place, pulling values from `reference`
/// only for fields currently at their default value. Nested models recurse
/// into their own `combine` rather than being replaced wholesale, because
/// they track defaults per field themselves.
pub trait Combine {
    /// Fill default-valued fields of `self` from `reference`.
    fn combine(&mut self, reference: &Self);

    /// Merge with an optional reference; `None` is a silent no-op.
    ///
    /// Merging is best-effort by design: a missing reference is not an
    /// error, it simply means there is nothing to inherit.
    fn combine_opt(&mut self, reference: Option<&Self>) {
        if let Some(reference) = reference {
            self.combine(reference);
        }
    }
}

// ============================================================================
// ApplyOptions
// ============================================================================

/// Sparse partial-update overlay.
///
/// The inverse of [`Combine`]: presence of a value (`Some`) drives the
/// overwrite, not absence. Implementations must treat an all-`None` options
/// value as a no-op.
pub trait ApplyOptions {
    /// The sparse options type overlaid onto this model.
    type Options;

    /// Overwrite each field for which the corresponding option is `Some`.
    fn apply_options(&mut self, options: &Self::Options);
}

// ============================================================================
// Keyed items and collections
// ============================================================================

/// An item with a stable identity key inside a [`KeyedCollection`].
///
/// String keys match case-insensitively (ordinal); enum keys match by value
/// equality.
pub trait Keyed {
    /// Key type; `str` for named items, a position/kind enum otherwise.
    type Key: ?Sized;

    /// The item's identity key.
    fn key(&self) -> &Self::Key;

    /// Whether this item answers to `key`.
    fn key_matches(&self, key: &Self::Key) -> bool;
}

/// Ordered container of identity-keyed items.
///
/// Lookup is first-match: if duplicate keys are pushed out-of-band, `get`
/// resolves to the earliest item and `combine` merges into that one.
/// Duplicates are never introduced by `combine` itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> KeyedCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, preserving insertion order.
    ///
    /// Key uniqueness is not enforced here; see the first-match policy on
    /// [`KeyedCollection::get`].
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Look up the first item matching `key`.
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key_matches(key))
    }

    /// Mutable first-match lookup.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key_matches(key))
    }

    /// Whether any item matches `key`.
    pub fn contains(&self, key: &T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable iteration in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a KeyedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for KeyedCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Keyed + Combine + Clone> Combine for KeyedCollection<T> {
    /// Reconcile with a reference collection by key union.
    ///
    /// Existing items keep their relative order and are field-merged with
    /// their reference counterpart; reference-only items are cloned and
    /// appended after them, in reference enumeration order.
    fn combine(&mut self, reference: &Self) {
        if self.items.is_empty() {
            self.items.extend(reference.items.iter().cloned());
            return;
        }
        for item in &mut self.items {
            if let Some(counterpart) = reference.get(item.key()) {
                item.combine(counterpart);
            }
        }
        for candidate in &reference.items {
            if !self.contains(candidate.key()) {
                self.items.push(candidate.clone());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Debug, PartialEq)]
    struct Swatch {
        name: String,
        shade: u32,
    }

    impl Swatch {
        fn new(name: &str, shade: u32) -> Self {
            Self {
                name: name.to_string(),
                shade,
            }
        }
    }

    impl Keyed for Swatch {
        type Key = str;

        fn key(&self) -> &str {
            &self.name
        }

        fn key_matches(&self, key: &str) -> bool {
            self.name.eq_ignore_ascii_case(key)
        }
    }

    impl Combine for Swatch {
        fn combine(&mut self, reference: &Self) {
            if self.shade == 0 {
                self.shade = reference.shade;
            }
        }
    }

    fn names(collection: &KeyedCollection<Swatch>) -> Vec<&str> {
        collection.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut c = KeyedCollection::new();
        c.push(Swatch::new("Accent", 3));

        assert!(c.contains("accent"));
        assert!(c.contains("ACCENT"));
        assert_eq!(c.get("aCcEnT").unwrap().shade, 3);
        assert!(c.get("accent2").is_none());
    }

    #[test]
    fn lookup_returns_first_match_on_duplicates() {
        let mut c = KeyedCollection::new();
        c.push(Swatch::new("dup", 1));
        c.push(Swatch::new("DUP", 2));

        assert_eq!(c.get("dup").unwrap().shade, 1);
        c.get_mut("dup").unwrap().shade = 9;
        assert_eq!(c.iter().next().unwrap().shade, 9);
    }

    #[test]
    fn combine_into_empty_clones_in_reference_order() {
        let mut receiver: KeyedCollection<Swatch> = KeyedCollection::new();
        let reference: KeyedCollection<Swatch> =
            [Swatch::new("b", 2), Swatch::new("a", 1)].into_iter().collect();

        receiver.combine(&reference);

        assert_eq!(names(&receiver), vec!["b", "a"]);
        assert_eq!(receiver.get("a").unwrap().shade, 1);
    }

    #[test]
    fn combine_produces_key_union() {
        let mut receiver: KeyedCollection<Swatch> =
            [Swatch::new("a", 0), Swatch::new("b", 5)].into_iter().collect();
        let reference: KeyedCollection<Swatch> =
            [Swatch::new("A", 7), Swatch::new("c", 3)].into_iter().collect();

        receiver.combine(&reference);

        // Existing items keep their order, reference-only items append after.
        assert_eq!(names(&receiver), vec!["a", "b", "c"]);
        // "a" was default-valued and pulled the reference shade.
        assert_eq!(receiver.get("a").unwrap().shade, 7);
        // "b" was customized and untouched.
        assert_eq!(receiver.get("b").unwrap().shade, 5);
        // "c" was cloned in, structurally equal to its reference counterpart.
        assert_eq!(receiver.get("c").unwrap(), reference.get("c").unwrap());
    }

    #[test]
    fn combine_appended_items_follow_reference_order() {
        let mut receiver: KeyedCollection<Swatch> =
            [Swatch::new("x", 1)].into_iter().collect();
        let reference: KeyedCollection<Swatch> =
            [Swatch::new("c", 1), Swatch::new("x", 2), Swatch::new("a", 3)]
                .into_iter()
                .collect();

        receiver.combine(&reference);

        assert_eq!(names(&receiver), vec!["x", "c", "a"]);
    }

    #[test]
    fn combine_with_self_is_identity() {
        let mut receiver: KeyedCollection<Swatch> =
            [Swatch::new("a", 0), Swatch::new("b", 5)].into_iter().collect();
        let snapshot = receiver.clone();

        receiver.combine(&snapshot);

        assert_eq!(receiver, snapshot);
    }

    #[test]
    fn combine_opt_none_is_noop() {
        let mut swatch = Swatch::new("a", 0);
        swatch.combine_opt(None);
        assert_eq!(swatch.shade, 0);

        swatch.combine_opt(Some(&Swatch::new("a", 4)));
        assert_eq!(swatch.shade, 4);
    }
}
