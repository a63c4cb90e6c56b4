//! Language-tagged column names.
//!
//! Translatable fields are spread across one column per language in the
//! tabular form: `label::English (en)`, `label::French (fr)`, and so on. This
//! module classifies and splits those column names.

use crate::{Error, Result};

/// Separator between a field's base name and its language tag.
pub const LANG_SEPARATOR: &str = "::";

/// Fields whose values are maps from language tag to text.
pub const TRANSLATABLE_FIELDS: [&str; 4] =
    ["label", "hint", "required_message", "constraint_message"];

/// A column name split into its base field and optional language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnName<'a> {
    pub base: &'a str,
    pub lang: Option<&'a str>,
}

/// Returns `true` if `base` is one of the translatable fields.
///
/// # Examples
///
/// ```rust
/// use cueform::lang::is_translatable;
///
/// assert!(is_translatable("label"));
/// assert!(is_translatable("constraint_message"));
/// assert!(!is_translatable("relevant"));
/// ```
#[inline]
#[must_use]
pub fn is_translatable(base: &str) -> bool {
    TRANSLATABLE_FIELDS.contains(&base)
}

/// Returns the part of `column` before the first `::`.
#[inline]
#[must_use]
pub fn column_base(column: &str) -> &str {
    column
        .split_once(LANG_SEPARATOR)
        .map_or(column, |(base, _)| base)
}

/// Splits a column name into base field and language tag.
///
/// `sheet` only feeds the error message.
///
/// # Errors
///
/// Returns [`Error::InvalidLabel`] when the base is translatable but no
/// language tag follows it, so a translation typed without a tag is never
/// silently dropped.
///
/// # Examples
///
/// ```rust
/// use cueform::lang::split_column;
///
/// let column = split_column("survey", "label::English (en)").unwrap();
/// assert_eq!(column.base, "label");
/// assert_eq!(column.lang, Some("English (en)"));
///
/// let column = split_column("survey", "relevant").unwrap();
/// assert_eq!(column.lang, None);
///
/// assert!(split_column("survey", "label").is_err());
/// ```
pub fn split_column<'a>(sheet: &str, column: &'a str) -> Result<ColumnName<'a>> {
    match column.split_once(LANG_SEPARATOR) {
        Some((base, lang)) if !lang.trim().is_empty() => Ok(ColumnName {
            base,
            lang: Some(lang),
        }),
        Some((base, _)) if is_translatable(base) => Err(Error::invalid_label(sheet, column)),
        Some((base, _)) => Ok(ColumnName { base, lang: None }),
        None if is_translatable(column) => Err(Error::invalid_label(sheet, column)),
        None => Ok(ColumnName {
            base: column,
            lang: None,
        }),
    }
}

/// Joins a base field and language tag into a column name.
#[inline]
#[must_use]
pub fn join_column(base: &str, lang: &str) -> String {
    format!("{}{}{}", base, LANG_SEPARATOR, lang)
}
