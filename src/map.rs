//! Language maps for translatable fields.
//!
//! This module provides [`LabelMap`], a wrapper around [`IndexMap`] from
//! language tag to display text. Insertion order is kept so that printed
//! configuration follows the column order of the source sheet, while equality
//! ignores order: two maps holding the same translations are equal.
//!
//! ## Examples
//!
//! ```rust
//! use cueform::LabelMap;
//!
//! let mut label = LabelMap::new();
//! label.insert("English (en)".to_string(), "Yes".to_string());
//! label.insert("French (fr)".to_string(), "Oui".to_string());
//!
//! assert_eq!(label.len(), 2);
//! assert_eq!(label.get("French (fr)"), Some("Oui"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map of language tags to translated text.
///
/// # Examples
///
/// ```rust
/// use cueform::LabelMap;
///
/// let a: LabelMap = [("en", "Yes"), ("fr", "Oui")].into_iter().collect();
/// let b: LabelMap = [("fr", "Oui"), ("en", "Yes")].into_iter().collect();
///
/// // Iteration keeps insertion order, equality does not care about it
/// assert_eq!(a.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap(IndexMap<String, String>);

impl LabelMap {
    /// Creates an empty `LabelMap`.
    #[must_use]
    pub fn new() -> Self {
        LabelMap(IndexMap::new())
    }

    /// Inserts the text for a language.
    ///
    /// If the map already held text for this language, the old text is returned.
    pub fn insert(&mut self, lang: String, text: String) -> Option<String> {
        self.0.insert(lang, text)
    }

    /// Returns the text for `lang`.
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the language tags, in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over `(language, text)` pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a LabelMap {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for LabelMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        LabelMap(
            iter.into_iter()
                .map(|(lang, text)| (lang.into(), text.into()))
                .collect(),
        )
    }
}
