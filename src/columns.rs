//! Canonical column ordering.
//!
//! Column sets are collected in maps whose iteration order says nothing about
//! where a column belongs in a sheet. [`resolve_columns`] turns such a set into
//! a stable header row so that the same form always produces the same sheet.

use crate::lang::LANG_SEPARATOR;
use std::collections::BTreeSet;

/// Preferred column order of the survey sheet.
pub const SURVEY_COLUMNS: [&str; 14] = [
    "type",
    "name",
    "label",
    "required",
    "required_message",
    "relevant",
    "constraint",
    "constraint_message",
    "hint",
    "choice_filter",
    "read_only",
    "calculation",
    "appearance",
    "default",
];

/// Preferred column order of the choices sheet.
pub const CHOICE_COLUMNS: [&str; 3] = ["list_name", "name", "label"];

/// Preferred column order of the settings sheet.
pub const SETTINGS_COLUMNS: [&str; 8] = [
    "form_title",
    "form_id",
    "version",
    "default_language",
    "instance_name",
    "style",
    "public_key",
    "submission_url",
];

/// Orders `observed` columns against a preferred base-name list.
///
/// Each preferred name is emitted verbatim when observed; otherwise every
/// observed `<name>::<lang>` column is emitted there as one run sorted by full
/// column name. Columns no preferred name claims follow in sorted order.
/// Duplicates in `observed` collapse.
///
/// # Examples
///
/// ```rust
/// use cueform::columns::{resolve_columns, SURVEY_COLUMNS};
///
/// let observed = ["label::French (fr)", "name", "relevant", "label::English (en)", "type", "zeta"];
/// let header = resolve_columns(observed, &SURVEY_COLUMNS);
/// assert_eq!(
///     header,
///     ["type", "name", "label::English (en)", "label::French (fr)", "relevant", "zeta"]
/// );
/// ```
#[must_use]
pub fn resolve_columns<I, S>(observed: I, preferred: &[&str]) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut remaining: BTreeSet<String> = observed.into_iter().map(Into::into).collect();
    let mut ordered = Vec::with_capacity(remaining.len());

    for &header in preferred {
        if remaining.remove(header) {
            ordered.push(header.to_string());
            continue;
        }
        let run: Vec<String> = remaining
            .iter()
            .filter(|column| {
                column
                    .split_once(LANG_SEPARATOR)
                    .map_or(false, |(base, _)| base == header)
            })
            .cloned()
            .collect();
        for column in &run {
            remaining.remove(column);
        }
        ordered.extend(run);
    }

    ordered.extend(remaining);
    ordered
}
