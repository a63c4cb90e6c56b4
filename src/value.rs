//! Configuration tree.
//!
//! This module provides [`ConfigValue`], the in-memory form of the
//! hierarchical configuration text, and [`ConfigFile`], a whole parsed file.
//! The printer in [`crate::ser`] and the parser in [`crate::de`] convert
//! between this tree and text; the document assembler converts between this
//! tree and a [`SurveyDocument`](crate::SurveyDocument).
//!
//! ## Core Types
//!
//! - [`ConfigValue`]: string literal, list, struct, reference or schema-qualified merge
//! - [`ConfigStruct`]: ordered fields of a struct literal
//! - [`Merge`]: `alias.#Definition & { ... }`
//!
//! ## Usage Patterns
//!
//! ```rust
//! use cueform::{ConfigStruct, ConfigValue, Merge};
//!
//! let mut body = ConfigStruct::new();
//! body.push("type", "text");
//! body.push("name", "family_name");
//!
//! let value = ConfigValue::Merge(Merge::new("schema", "Question", body));
//! let merge = value.as_merge().unwrap();
//!
//! assert_eq!(merge.definition, "Question");
//! assert_eq!(merge.body.get("name").and_then(ConfigValue::as_str), Some("family_name"));
//! ```

use std::fmt;

/// Any value of the configuration language subset.
///
/// # Examples
///
/// ```rust
/// use cueform::ConfigValue;
///
/// let value = ConfigValue::from("yes");
/// assert!(value.is_string());
///
/// let reference = ConfigValue::reference(["_choices", "yes_no"]);
/// assert_eq!(reference.as_reference().map(|p| p.len()), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    String(String),
    List(Vec<ConfigValue>),
    Struct(ConfigStruct),
    /// A dotted path to another member, e.g. `_choices.yes_no`.
    Reference(Vec<String>),
    Merge(Merge),
}

/// A schema-qualified merge: `package.#definition & { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Merge {
    /// Import alias the definition is qualified with.
    pub package: String,
    /// Definition name without the leading `#`.
    pub definition: String,
    pub body: ConfigStruct,
}

impl Merge {
    #[must_use]
    pub fn new(package: &str, definition: &str, body: ConfigStruct) -> Self {
        Merge {
            package: package.to_string(),
            definition: definition.to_string(),
            body,
        }
    }
}

/// A labelled member of a struct.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: ConfigValue,
}

/// The ordered fields of a struct literal.
///
/// Labels are not required to be unique; lookups return the first match.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ConfigStruct {
    pub fields: Vec<Field>,
}

impl ConfigStruct {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, label: &str, value: impl Into<ConfigValue>) {
        self.fields.push(Field {
            label: label.to_string(),
            value: value.into(),
        });
    }

    /// Returns the value of the first field labelled `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ConfigValue> {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| &field.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a ConfigStruct {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigStruct {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ConfigStruct {
            fields: iter
                .into_iter()
                .map(|(label, value)| Field {
                    label: label.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }
}

/// A whole configuration file: package clause, imports and top-level fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ConfigFile {
    pub package: String,
    /// Import paths, in declaration order.
    pub imports: Vec<String>,
    pub fields: ConfigStruct,
}

impl ConfigFile {
    #[must_use]
    pub fn new(package: &str) -> Self {
        ConfigFile {
            package: package.to_string(),
            ..Default::default()
        }
    }
}

impl ConfigValue {
    /// Builds a reference from path segments.
    pub fn reference<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConfigValue::Reference(path.into_iter().map(Into::into).collect())
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, ConfigValue::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, ConfigValue::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, ConfigValue::Struct(_))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_struct(&self) -> Option<&ConfigStruct> {
        match self {
            ConfigValue::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_reference(&self) -> Option<&[String]> {
        match self {
            ConfigValue::Reference(path) => Some(path),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_merge(&self) -> Option<&Merge> {
        match self {
            ConfigValue::Merge(merge) => Some(merge),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Struct(_) => "struct",
            ConfigValue::Reference(_) => "reference",
            ConfigValue::Merge(_) => "definition merge",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::value_to_string(self, &crate::FormOptions::default()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::List(value)
    }
}

impl From<ConfigStruct> for ConfigValue {
    fn from(value: ConfigStruct) -> Self {
        ConfigValue::Struct(value)
    }
}

impl From<Merge> for ConfigValue {
    fn from(value: Merge) -> Self {
        ConfigValue::Merge(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_lookup_returns_first_match() {
        let mut fields = ConfigStruct::new();
        fields.push("name", "a");
        fields.push("name", "b");
        assert_eq!(fields.get("name").and_then(ConfigValue::as_str), Some("a"));
        assert!(fields.get("type").is_none());
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let value = ConfigValue::from(vec![ConfigValue::from("x")]);
        assert!(value.is_list());
        assert!(value.as_str().is_none());
        assert!(value.as_struct().is_none());
        assert_eq!(value.kind_name(), "list");
    }

    #[test]
    fn test_from_iterator() {
        let fields: ConfigStruct = [("English (en)", "Yes"), ("French (fr)", "Oui")]
            .into_iter()
            .collect();
        let labels: Vec<_> = fields.iter().map(|field| field.label.as_str()).collect();
        assert_eq!(labels, vec!["English (en)", "French (fr)"]);
    }

    #[test]
    fn test_display_prints_value() {
        let value = ConfigValue::reference(["_choices", "yes_no"]);
        assert_eq!(value.to_string(), "_choices.yes_no");
    }
}
