//! Settings adapter.
//!
//! The settings sheet holds at most one data row of form-level values. In
//! configuration text that row becomes the `form_settings` member, tagged with
//! the reserved discriminator `type: "settings"`.

use crate::columns::{resolve_columns, SETTINGS_COLUMNS};
use crate::model::Settings;
use crate::sheet::{self, is_blank_row, Record, Sheet, Table, SETTINGS_SHEET};
use crate::value::{ConfigStruct, ConfigValue};
use crate::{Error, Result};
use log::debug;

/// Field name of the settings discriminator.
pub const DISCRIMINATOR: &str = "type";

/// Value of the settings discriminator.
pub const SETTINGS_TYPE: &str = "settings";

/// Reads the settings sheet.
///
/// Returns `None` when the sheet has no data rows. Blank rows are padding and
/// do not count.
///
/// # Errors
///
/// [`Error::EmptySheet`] without a header row, [`Error::MultipleSettingsRows`]
/// when more than one data row holds values.
///
/// # Examples
///
/// ```rust
/// use cueform::sheet;
/// use cueform::settings::lift;
///
/// let settings = lift(&sheet![
///     ["form_title", "version"],
///     ["Household survey", "2024010101"],
/// ])
/// .unwrap()
/// .unwrap();
///
/// assert_eq!(settings.get("form_title"), Some("Household survey"));
/// ```
pub fn lift(sheet: &Sheet) -> Result<Option<Settings>> {
    let table = Table::open(SETTINGS_SHEET, sheet)?;
    let rows: Vec<&Vec<String>> = table.rows.iter().filter(|row| !is_blank_row(row)).collect();

    let row = match rows.as_slice() {
        [] => {
            debug!(sheet = SETTINGS_SHEET; "Settings sheet has no data row");
            return Ok(None);
        }
        [row] => *row,
        many => return Err(Error::MultipleSettingsRows(many.len())),
    };

    let mut settings = Settings::new();
    for (index, column) in table.header.iter().enumerate() {
        let value = Table::cell(row, index);
        if column.is_empty() || value.is_empty() {
            continue;
        }
        if column == DISCRIMINATOR {
            debug!(sheet = SETTINGS_SHEET, value:% = value; "Dropping reserved settings column");
            continue;
        }
        settings.insert(column.clone(), value.to_string());
    }
    Ok(Some(settings))
}

/// Writes settings as a header row and a single value row.
pub fn lower(settings: &Settings) -> Sheet {
    let record: Record = settings
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let header = resolve_columns(record.keys().cloned(), &SETTINGS_COLUMNS);
    sheet::from_records(header, &[record])
}

/// Builds the body of the `form_settings` member, discriminator first.
pub fn to_config_struct(settings: &Settings) -> ConfigStruct {
    let mut body = ConfigStruct::new();
    body.push(DISCRIMINATOR, SETTINGS_TYPE);
    for (key, value) in settings.iter() {
        if key != DISCRIMINATOR {
            body.push(key, value.as_str());
        }
    }
    body
}

/// Reads the body of the `form_settings` member, stripping the discriminator.
///
/// # Errors
///
/// [`Error::Shape`] when the discriminator is missing or wrong, or a field is
/// not a string.
pub fn from_config_struct(body: &ConfigStruct, path: &str) -> Result<Settings> {
    match body.get(DISCRIMINATOR).and_then(ConfigValue::as_str) {
        Some(SETTINGS_TYPE) => {}
        Some(other) => {
            return Err(Error::shape(
                path,
                format!("expected type \"{}\", found \"{}\"", SETTINGS_TYPE, other),
            ))
        }
        None => {
            return Err(Error::shape(
                path,
                format!("missing string field '{}'", DISCRIMINATOR),
            ))
        }
    }

    let mut settings = Settings::new();
    for field in body {
        if field.label == DISCRIMINATOR {
            continue;
        }
        let value = field.value.as_str().ok_or_else(|| {
            Error::shape(
                &format!("{}.{}", path, field.label),
                format!("expected string, found {}", field.value.kind_name()),
            )
        })?;
        settings.insert(field.label.clone(), value.to_string());
    }
    Ok(settings)
}
