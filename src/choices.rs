//! Choice-list table.
//!
//! The choices sheet is a flat list of rows, each naming the list it belongs
//! to in its `list_name` column. Decoding groups those rows into
//! [`ChoiceList`]s held by a [`ChoiceTable`] that select questions are resolved
//! against; encoding flattens the referenced lists back into rows.

use crate::columns::{resolve_columns, CHOICE_COLUMNS};
use crate::lang::{join_column, split_column};
use crate::model::{ChoiceEntry, ChoiceList};
use crate::sheet::{self, is_blank_row, Record, Sheet, Table, CHOICES_SHEET, REQUIRED_CHOICE_COLUMNS};
use crate::{Error, LabelMap, Result};
use indexmap::IndexMap;
use log::{debug, warn};

/// Reserved choice code that tags filter categories rather than a selectable value.
pub const FILTER_CATEGORY: &str = "filterCategory";

const LIST_NAME: &str = "list_name";
const NAME: &str = "name";
const LABEL: &str = "label";

/// Choice lists of one workbook, keyed by list name in sheet order.
#[derive(Debug, Clone, Default)]
pub struct ChoiceTable {
    lists: IndexMap<String, ChoiceList>,
}

impl ChoiceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the choices sheet.
    ///
    /// # Errors
    ///
    /// Fails when the sheet has no header, lacks a required column, declares
    /// a translatable column without a language tag, or holds a choice row
    /// with no label.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let table = Table::open(CHOICES_SHEET, sheet)?;
        table.require(&REQUIRED_CHOICE_COLUMNS)?;
        let list_index = table
            .column(LIST_NAME)
            .ok_or_else(|| Error::missing_column(CHOICES_SHEET, LIST_NAME))?;
        let name_index = table
            .column(NAME)
            .ok_or_else(|| Error::missing_column(CHOICES_SHEET, NAME))?;

        let mut choices = ChoiceTable::new();
        for (i, row) in table.rows.iter().enumerate() {
            let row_number = i + 2;
            if is_blank_row(row) {
                debug!(sheet = CHOICES_SHEET, row = row_number; "Skipping padding row");
                continue;
            }
            let list_name = Table::cell(row, list_index);
            if list_name.is_empty() {
                warn!(sheet = CHOICES_SHEET, row = row_number; "Skipping choice row without list_name");
                continue;
            }
            let code = Table::cell(row, name_index);
            if code == FILTER_CATEGORY {
                debug!(list:% = list_name, row = row_number; "Skipping filter category row");
                continue;
            }

            let entry = build_entry(&table, row, code)?;
            if entry.label.is_empty() {
                return Err(Error::missing_label(CHOICES_SHEET, list_name, code));
            }
            choices
                .lists
                .entry(list_name.to_string())
                .or_insert_with(|| ChoiceList::new(list_name))
                .entries
                .push(entry);
        }

        debug!(lists = choices.lists.len(); "Choice lists decoded");
        Ok(choices)
    }

    /// Looks up the list a question selects from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownChoiceList`] when no list of that name exists.
    pub fn resolve(&self, question: &str, list: &str) -> Result<&ChoiceList> {
        self.lists
            .get(list)
            .ok_or_else(|| Error::unknown_choice_list(question, list))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn into_lists(self) -> IndexMap<String, ChoiceList> {
        self.lists
    }
}

fn build_entry(table: &Table<'_>, row: &[String], code: &str) -> Result<ChoiceEntry> {
    let mut label = LabelMap::new();
    let mut attributes = IndexMap::new();

    for (index, column) in table.header.iter().enumerate() {
        let value = Table::cell(row, index);
        if column.is_empty() || value.is_empty() || column == LIST_NAME || column == NAME {
            continue;
        }
        let column_name = split_column(CHOICES_SHEET, column)?;
        match column_name.lang {
            Some(lang) if column_name.base == LABEL => {
                label.insert(lang.to_string(), value.to_string());
            }
            _ => {
                attributes.insert(column.clone(), value.to_string());
            }
        }
    }

    if row.iter().skip(table.header.len()).any(|cell| !cell.is_empty()) {
        warn!(sheet = CHOICES_SHEET, code:% = code; "Ignoring cells beyond the last header column");
    }

    Ok(ChoiceEntry {
        code: code.to_string(),
        label,
        attributes,
    })
}

/// Flattens `lists` into a choices sheet, one row per entry, lists in the
/// order given.
///
/// # Errors
///
/// Returns [`Error::MissingLabel`] for an entry without any translation, which
/// would leave the sheet without its required `label` column.
pub fn encode_choices<'a, I>(lists: I) -> Result<Sheet>
where
    I: IntoIterator<Item = &'a ChoiceList>,
{
    let mut records = Vec::new();
    let mut columns: Vec<String> = vec![LIST_NAME.to_string(), NAME.to_string()];

    for list in lists {
        for entry in &list.entries {
            if entry.label.is_empty() {
                return Err(Error::missing_label(CHOICES_SHEET, &list.name, &entry.code));
            }
            let mut record = Record::new();
            record.insert(LIST_NAME.to_string(), list.name.clone());
            record.insert(NAME.to_string(), entry.code.clone());
            for (lang, text) in &entry.label {
                record.insert(join_column(LABEL, lang), text.clone());
            }
            for (key, value) in &entry.attributes {
                record.insert(key.clone(), value.clone());
            }
            columns.extend(record.keys().cloned());
            records.push(record);
        }
    }

    let header = resolve_columns(columns, &CHOICE_COLUMNS);
    Ok(sheet::from_records(header, &records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet as sheet_rows;

    fn yes_no_sheet() -> Sheet {
        sheet_rows![
            ["list_name", "name", "label::English (en)", "label::French (fr)"],
            ["yes_no", "yes", "Yes", "Oui"],
            [],
            ["yes_no", "no", "No", "Non"],
            ["colors", "red", "Red"],
        ]
    }

    #[test]
    fn test_rows_group_by_list_name() {
        let table = ChoiceTable::from_sheet(&yes_no_sheet()).unwrap();
        assert_eq!(table.len(), 2);
        let yes_no = table.resolve("q", "yes_no").unwrap();
        assert_eq!(yes_no.entries.len(), 2);
        assert_eq!(yes_no.entries[1].code, "no");
        assert_eq!(yes_no.entries[1].label.get("French (fr)"), Some("Non"));
        // Ragged row: the missing French cell is simply absent
        let colors = table.resolve("q", "colors").unwrap();
        assert_eq!(colors.entries[0].label.len(), 1);
    }

    #[test]
    fn test_unknown_list() {
        let table = ChoiceTable::from_sheet(&yes_no_sheet()).unwrap();
        assert_eq!(
            table.resolve("likes_pizza", "maybe").unwrap_err(),
            Error::unknown_choice_list("likes_pizza", "maybe")
        );
    }

    #[test]
    fn test_filter_category_is_excluded() {
        let sheet = sheet_rows![
            ["list_name", "name", "label::en"],
            ["cities", "filterCategory", "Country"],
            ["cities", "paris", "Paris"],
        ];
        let table = ChoiceTable::from_sheet(&sheet).unwrap();
        let cities = table.resolve("q", "cities").unwrap();
        assert_eq!(cities.entries.len(), 1);
        assert_eq!(cities.entries[0].code, "paris");
    }

    #[test]
    fn test_extra_columns_become_attributes() {
        let sheet = sheet_rows![
            ["list_name", "name", "label::en", "country"],
            ["cities", "paris", "Paris", "france"],
        ];
        let table = ChoiceTable::from_sheet(&sheet).unwrap();
        let entry = &table.resolve("q", "cities").unwrap().entries[0];
        assert_eq!(entry.attributes.get("country").map(String::as_str), Some("france"));
    }

    #[test]
    fn test_bare_label_column() {
        let sheet = sheet_rows![["list_name", "name", "label"], ["a", "b", "c"]];
        assert_eq!(
            ChoiceTable::from_sheet(&sheet).unwrap_err(),
            Error::invalid_label("choices", "label")
        );
    }

    #[test]
    fn test_encode_resolves_header() {
        let list = ChoiceList::new("yes_no")
            .with_entry("yes", [("French (fr)", "Oui"), ("English (en)", "Yes")])
            .with_entry("no", [("English (en)", "No")]);
        let sheet = encode_choices([&list]).unwrap();
        assert_eq!(
            sheet.rows,
            vec![
                vec!["list_name", "name", "label::English (en)", "label::French (fr)"],
                vec!["yes_no", "yes", "Yes", "Oui"],
                vec!["yes_no", "no", "No", ""],
            ]
        );
    }

    #[test]
    fn test_unlabelled_row_is_rejected() {
        let sheet = sheet_rows![
            ["list_name", "name", "label::en", "label::fr"],
            ["yes_no", "yes", "Yes", ""],
            ["yes_no", "maybe", "", ""],
        ];
        assert_eq!(
            ChoiceTable::from_sheet(&sheet).unwrap_err(),
            Error::missing_label("choices", "yes_no", "maybe")
        );
    }

    #[test]
    fn test_encode_rejects_unlabelled_entry() {
        let list = ChoiceList::new("yes_no")
            .with_entry("yes", [("en", "Yes")])
            .with_entry("no", Vec::<(String, String)>::new());
        assert_eq!(
            encode_choices([&list]).unwrap_err(),
            Error::missing_label("choices", "yes_no", "no")
        );
    }
}
