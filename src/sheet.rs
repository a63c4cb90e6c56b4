//! Tabular side of the conversion.
//!
//! A [`Workbook`] is a set of named [`Sheet`]s, each an ordered list of rows of
//! string cells. Row 0 is the header. Rows may be ragged: a cell missing at the
//! end of a row reads as empty. Reading and writing the physical spreadsheet
//! file is left to the caller; this module only fixes the shape the
//! transcoder consumes and produces.
//!
//! ## Examples
//!
//! ```rust
//! use cueform::{sheet, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.insert_sheet(
//!     "survey",
//!     sheet![
//!         ["type", "name", "label::English (en)"],
//!         ["text", "family_name", "What's your family name?"],
//!     ],
//! );
//!
//! let survey = workbook.sheet("survey").unwrap();
//! assert_eq!(survey.header().map(|h| h.len()), Some(3));
//! assert_eq!(survey.data_rows().len(), 1);
//! ```

use crate::lang::{column_base, split_column};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SURVEY_SHEET: &str = "survey";
pub const CHOICES_SHEET: &str = "choices";
pub const SETTINGS_SHEET: &str = "settings";

/// Columns every survey sheet must declare.
pub const REQUIRED_SURVEY_COLUMNS: [&str; 3] = ["type", "name", "label"];

/// Columns every choices sheet must declare.
pub const REQUIRED_CHOICE_COLUMNS: [&str; 3] = ["list_name", "name", "label"];

/// One named sheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub rows: Vec<Vec<String>>,
    /// Display width applied to every column without an explicit width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_width: Option<f64>,
    /// Display widths keyed by 0-based column index.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<usize, f64>,
}

impl Sheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sheet from rows, header first.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Sheet {
            rows,
            ..Default::default()
        }
    }

    /// Returns the header row, or `None` for a sheet with no rows at all.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns every row after the header.
    #[must_use]
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn set_default_width(&mut self, width: f64) {
        self.default_width = Some(width);
    }

    pub fn set_column_width(&mut self, column: usize, width: f64) {
        self.column_widths.insert(column, width);
    }

    /// Effective display width of a column.
    #[must_use]
    pub fn column_width(&self, column: usize) -> Option<f64> {
        self.column_widths
            .get(&column)
            .copied()
            .or(self.default_width)
    }
}

/// An ordered collection of named sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(name)
    }

    /// Adds a sheet, replacing and returning any sheet of the same name.
    pub fn insert_sheet(&mut self, name: &str, sheet: Sheet) -> Option<Sheet> {
        self.sheets.insert(name.to_string(), sheet)
    }

    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        self.sheets.shift_remove(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// One encoded row keyed by column name.
pub(crate) type Record = IndexMap<String, String>;

/// Builds a sheet from `header` and records projected onto it.
///
/// Cells a record does not hold are left empty.
pub(crate) fn from_records(header: Vec<String>, records: &[Record]) -> Sheet {
    let mut rows = Vec::with_capacity(records.len() + 1);
    for record in records {
        rows.push(
            header
                .iter()
                .map(|column| record.get(column).cloned().unwrap_or_default())
                .collect(),
        );
    }
    rows.insert(0, header);
    Sheet::from_rows(rows)
}

/// Returns `true` for rows with no cells or only empty cells.
#[inline]
pub(crate) fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// A validated read view over one sheet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Table<'a> {
    pub name: &'a str,
    pub header: &'a [String],
    pub rows: &'a [Vec<String>],
}

impl<'a> Table<'a> {
    /// Opens `sheet` for reading.
    ///
    /// Fails with [`Error::EmptySheet`] when the sheet has no header row.
    pub fn open(name: &'a str, sheet: &'a Sheet) -> Result<Self> {
        let header = sheet
            .header()
            .ok_or_else(|| Error::EmptySheet(name.to_string()))?;
        Ok(Table {
            name,
            header,
            rows: sheet.data_rows(),
        })
    }

    /// Checks language tags on every header column, then the required columns.
    ///
    /// Language tags are checked first so a bare `label` column is reported as
    /// a label error whatever else the header holds. A required translatable
    /// column is satisfied by any tagged column of that base.
    pub fn require(&self, required: &[&str]) -> Result<()> {
        for column in self.header.iter().filter(|column| !column.is_empty()) {
            split_column(self.name, column)?;
        }
        for &required_column in required {
            let present = self
                .header
                .iter()
                .any(|column| column == required_column || column_base(column) == required_column);
            if !present {
                return Err(Error::missing_column(self.name, required_column));
            }
        }
        Ok(())
    }

    /// Index of the first header column named exactly `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Cell at `index` of `row`, empty when the row is too short.
    pub fn cell(row: &[String], index: usize) -> &str {
        row.get(index).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet;

    #[test]
    fn test_empty_sheet_is_rejected() {
        let empty = Sheet::new();
        let err = Table::open(SURVEY_SHEET, &empty).unwrap_err();
        assert_eq!(err, Error::EmptySheet("survey".to_string()));
    }

    #[test]
    fn test_required_columns() {
        let survey = sheet![["type", "name", "label::English (en)"]];
        let table = Table::open(SURVEY_SHEET, &survey).unwrap();
        assert!(table.require(&REQUIRED_SURVEY_COLUMNS).is_ok());

        let survey = sheet![["hello"], ["world"]];
        let table = Table::open(SURVEY_SHEET, &survey).unwrap();
        assert_eq!(
            table.require(&REQUIRED_SURVEY_COLUMNS).unwrap_err(),
            Error::missing_column("survey", "type")
        );
    }

    #[test]
    fn test_bare_label_beats_missing_columns() {
        let choices = sheet![["label"]];
        let table = Table::open(CHOICES_SHEET, &choices).unwrap();
        assert_eq!(
            table.require(&REQUIRED_CHOICE_COLUMNS).unwrap_err(),
            Error::invalid_label("choices", "label")
        );
    }

    #[test]
    fn test_ragged_cells_read_empty() {
        let row = vec!["end_group".to_string()];
        assert_eq!(Table::cell(&row, 0), "end_group");
        assert_eq!(Table::cell(&row, 2), "");
    }

    #[test]
    fn test_records_project_onto_header() {
        let mut record = Record::new();
        record.insert("name".to_string(), "age".to_string());
        record.insert("type".to_string(), "integer".to_string());
        let header = vec!["type".to_string(), "name".to_string(), "hint::en".to_string()];
        let sheet = from_records(header, &[record]);
        assert_eq!(sheet.rows[1], vec!["integer", "age", ""]);
    }

    #[test]
    fn test_blank_rows() {
        assert!(is_blank_row(&[]));
        assert!(is_blank_row(&[String::new(), String::new()]));
        assert!(!is_blank_row(&["x".to_string()]));
    }

    #[test]
    fn test_column_width_falls_back_to_default() {
        let mut sheet = Sheet::new();
        sheet.set_default_width(30.0);
        sheet.set_column_width(2, 50.0);
        assert_eq!(sheet.column_width(2), Some(50.0));
        assert_eq!(sheet.column_width(0), Some(30.0));
    }

    #[test]
    fn test_workbook_sheet_management() {
        let mut workbook = Workbook::new();
        workbook.insert_sheet("Sheet1", Sheet::new());
        workbook.insert_sheet(SURVEY_SHEET, Sheet::new());
        assert!(workbook.remove_sheet("Sheet1").is_some());
        assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["survey"]);
    }
}
