//! Rows to tree.

use super::{is_begin, is_end};
use crate::choices::ChoiceTable;
use crate::lang::{is_translatable, split_column};
use crate::model::{Attribute, Attributes, Element, Group, Question};
use crate::sheet::{is_blank_row, Sheet, Table, REQUIRED_SURVEY_COLUMNS, SURVEY_SHEET};
use crate::{Error, LabelMap, Result};
use log::{debug, warn};

const TYPE: &str = "type";
const NAME: &str = "name";
const SELECT_PREFIX: &str = "select_";
const FROM_FILE_SUFFIX: &str = "_from_file";

/// Decodes the survey sheet into top-level elements.
///
/// Select questions are checked against `choices`.
///
/// # Errors
///
/// - [`Error::EmptySheet`], [`Error::MissingColumn`] or [`Error::InvalidLabel`]
///   for a malformed header
/// - [`Error::UnbalancedGroup`] when begin/end markers do not pair up
/// - [`Error::UnknownChoiceList`] when a select question names a missing list
///
/// # Examples
///
/// ```rust
/// use cueform::choices::ChoiceTable;
/// use cueform::sheet;
/// use cueform::survey::decode_survey;
///
/// let survey = sheet![
///     ["type", "name", "label::English (en)"],
///     ["begin_group", "father", "Father"],
///     ["integer", "age", "How old is your father?"],
///     ["end_group"],
/// ];
///
/// let elements = decode_survey(&survey, &ChoiceTable::new()).unwrap();
/// assert_eq!(elements.len(), 1);
/// assert_eq!(elements[0].name(), "father");
/// assert_eq!(elements[0].depth(), 2);
/// ```
pub fn decode_survey(sheet: &Sheet, choices: &ChoiceTable) -> Result<Vec<Element>> {
    let table = Table::open(SURVEY_SHEET, sheet)?;
    table.require(&REQUIRED_SURVEY_COLUMNS)?;
    let type_index = table
        .column(TYPE)
        .ok_or_else(|| Error::missing_column(SURVEY_SHEET, TYPE))?;

    let decoder = SurveyDecoder {
        table,
        type_index,
        choices,
    };
    decoder.decode_rows(table.rows, 0)
}

struct SurveyDecoder<'a> {
    table: Table<'a>,
    type_index: usize,
    choices: &'a ChoiceTable,
}

impl<'a> SurveyDecoder<'a> {
    /// Decodes a run of sibling rows.
    ///
    /// `offset` is the index of `rows[0]` among the sheet's data rows, so
    /// errors report sheet row numbers at any depth.
    fn decode_rows(&self, rows: &[Vec<String>], offset: usize) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        let mut open_markers = 0usize;
        let mut start = 0usize;

        for (i, row) in rows.iter().enumerate() {
            if is_blank_row(row) {
                if open_markers == 0 {
                    debug!(sheet = SURVEY_SHEET, row = sheet_row(offset + i); "Skipping padding row");
                }
                continue;
            }

            let type_cell = Table::cell(row, self.type_index).trim();
            if is_begin(type_cell) {
                if open_markers == 0 {
                    start = i;
                }
                open_markers += 1;
            } else if is_end(type_cell) {
                if open_markers == 0 {
                    return Err(Error::unbalanced_group(
                        sheet_row(offset + i),
                        "end marker without matching begin",
                    ));
                }
                open_markers -= 1;
                if open_markers == 0 {
                    let children = self.decode_rows(&rows[start + 1..i], offset + start + 1)?;
                    let group = self.build_group(&rows[start], children)?;
                    elements.push(Element::Group(group));
                }
            } else if open_markers == 0 {
                if let Some(question) = self.build_question(row, sheet_row(offset + i))? {
                    elements.push(Element::Question(question));
                }
            }
        }

        if open_markers > 0 {
            return Err(Error::unbalanced_group(
                sheet_row(offset + start),
                "begin marker is never closed",
            ));
        }
        Ok(elements)
    }

    fn build_group(&self, row: &[String], children: Vec<Element>) -> Result<Group> {
        let cells = self.read_row(row)?;
        Ok(Group {
            name: cells.name,
            group_type: cells.type_cell,
            attributes: cells.attributes,
            children,
        })
    }

    fn build_question(&self, row: &[String], row_number: usize) -> Result<Option<Question>> {
        let cells = self.read_row(row)?;
        if cells.type_cell.is_empty() && cells.name.is_empty() {
            warn!(sheet = SURVEY_SHEET, row = row_number; "Skipping row with neither type nor name");
            return Ok(None);
        }

        let (question_type, list) = split_select(&cells.type_cell);
        if let Some(list) = list {
            self.choices.resolve(&cells.name, list)?;
        } else if question_type.starts_with(SELECT_PREFIX) && !question_type.contains(FROM_FILE_SUFFIX) {
            warn!(question:% = cells.name, row = row_number; "Select question names no choice list");
        }

        Ok(Some(Question {
            question_type: question_type.to_string(),
            choices: list.map(str::to_string),
            name: cells.name,
            attributes: cells.attributes,
        }))
    }

    /// Reads the non-empty cells of a row against the header.
    fn read_row(&self, row: &[String]) -> Result<RowCells> {
        let mut cells = RowCells::default();

        for (index, column) in self.table.header.iter().enumerate() {
            let value = Table::cell(row, index);
            if column.is_empty() || value.is_empty() {
                continue;
            }
            match column.as_str() {
                TYPE => cells.type_cell = value.trim().to_string(),
                NAME => cells.name = value.to_string(),
                _ => {
                    let column_name = split_column(SURVEY_SHEET, column)?;
                    match column_name.lang {
                        Some(lang) if is_translatable(column_name.base) => {
                            fold_translation(&mut cells.attributes, column_name.base, lang, value);
                        }
                        _ => {
                            cells
                                .attributes
                                .insert(column.clone(), Attribute::Text(value.to_string()));
                        }
                    }
                }
            }
        }

        let orphans = row
            .iter()
            .skip(self.table.header.len())
            .filter(|cell| !cell.is_empty())
            .count();
        if orphans > 0 {
            warn!(sheet = SURVEY_SHEET, name:% = cells.name, cells = orphans; "Ignoring cells beyond the last header column");
        }

        Ok(cells)
    }
}

#[derive(Default)]
struct RowCells {
    type_cell: String,
    name: String,
    attributes: Attributes,
}

fn fold_translation(attributes: &mut Attributes, base: &str, lang: &str, text: &str) {
    if let Some(Attribute::Labels(labels)) = attributes.get_mut(base) {
        labels.insert(lang.to_string(), text.to_string());
        return;
    }
    let mut labels = LabelMap::new();
    labels.insert(lang.to_string(), text.to_string());
    attributes.insert(base.to_string(), Attribute::Labels(labels));
}

/// Splits `select_<x> <list>` on the first whitespace.
///
/// `*_from_file` types name a file rather than a list and are kept whole.
fn split_select(type_cell: &str) -> (&str, Option<&str>) {
    if !type_cell.starts_with(SELECT_PREFIX) {
        return (type_cell, None);
    }
    match type_cell.split_once(char::is_whitespace) {
        Some((kind, _)) if kind.ends_with(FROM_FILE_SUFFIX) => (type_cell, None),
        Some((kind, list)) if !list.trim().is_empty() => (kind, Some(list.trim())),
        _ => (type_cell, None),
    }
}

/// 1-based sheet row of a 0-based data row index, counting the header.
#[inline]
fn sheet_row(data_index: usize) -> usize {
    data_index + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet;

    fn decode(sheet: &Sheet) -> Result<Vec<Element>> {
        decode_survey(sheet, &ChoiceTable::new())
    }

    #[test]
    fn test_split_select() {
        assert_eq!(split_select("select_one yes_no"), ("select_one", Some("yes_no")));
        assert_eq!(split_select("select_multiple  colors "), ("select_multiple", Some("colors")));
        assert_eq!(
            split_select("select_one_from_file cities.csv"),
            ("select_one_from_file cities.csv", None)
        );
        assert_eq!(split_select("select_one"), ("select_one", None));
        assert_eq!(split_select("text"), ("text", None));
    }

    #[test]
    fn test_single_question() {
        let survey = sheet![["type", "name", "label::English (en)"], ["text", "family_name", "What's your family name?"]];
        let elements = decode(&survey).unwrap();
        let Element::Question(question) = &elements[0] else {
            panic!("expected a question");
        };
        assert_eq!(question.question_type, "text");
        assert_eq!(
            elements[0].label().and_then(|l| l.get("English (en)")),
            Some("What's your family name?")
        );
    }

    #[test]
    fn test_nested_groups() {
        let survey = sheet![
            ["type", "name", "label::English (en)"],
            ["begin_group", "a", "A"],
            ["begin_group", "b", "B"],
            ["text", "c", "C"],
            ["end_group"],
            ["text", "d", "D"],
            ["end_group"],
            ["text", "e", "E"],
        ];
        let elements = decode(&survey).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].depth(), 3);
        let Element::Group(a) = &elements[0] else {
            panic!("expected a group");
        };
        let names: Vec<_> = a.children.iter().map(Element::name).collect();
        assert_eq!(names, vec!["b", "d"]);
    }

    #[test]
    fn test_empty_group_has_empty_children() {
        let survey = sheet![["type", "name", "label::English (en)"], ["begin_group", "g", "G"], ["end_group"]];
        let elements = decode(&survey).unwrap();
        let Element::Group(group) = &elements[0] else {
            panic!("expected a group");
        };
        assert!(group.children.is_empty());
    }

    #[test]
    fn test_extra_end_marker_reports_row() {
        let survey = sheet![
            ["type", "name", "label::English (en)"],
            ["begin_group", "g", "G"],
            ["end_group"],
            ["end_group"],
        ];
        assert_eq!(
            decode(&survey).unwrap_err(),
            Error::unbalanced_group(4, "end marker without matching begin")
        );
    }

    #[test]
    fn test_unclosed_group_reports_opening_row() {
        let survey = sheet![
            ["type", "name", "label::English (en)"],
            ["text", "q", "Q"],
            ["begin_group", "outer", "Outer"],
            ["begin_group", "inner", "Inner"],
            ["end_group"],
        ];
        assert_eq!(
            decode(&survey).unwrap_err(),
            Error::unbalanced_group(3, "begin marker is never closed")
        );
    }

    #[test]
    fn test_padding_rows_are_skipped() {
        let survey = sheet![["type", "name", "label::English (en)"], [], ["", "", ""], ["integer", "age", "Age"]];
        assert_eq!(decode(&survey).unwrap().len(), 1);
    }

    #[test]
    fn test_translations_fold_per_base() {
        let survey = sheet![
            ["type", "name", "label::en", "hint::en", "label::fr", "relevant"],
            ["integer", "age", "Age", "Years", "Âge", "${x} = 1"],
        ];
        let elements = decode(&survey).unwrap();
        let attributes = elements[0].attributes();
        assert_eq!(attributes["label"].as_labels().map(LabelMap::len), Some(2));
        assert_eq!(attributes["hint"].as_labels().and_then(|h| h.get("en")), Some("Years"));
        assert_eq!(attributes["relevant"].as_text(), Some("${x} = 1"));
    }

    #[test]
    fn test_unknown_choice_list() {
        let survey = sheet![["type", "name", "label::English (en)"], ["select_one yes_no", "likes_pizza", "Pizza?"]];
        assert_eq!(
            decode(&survey).unwrap_err(),
            Error::unknown_choice_list("likes_pizza", "yes_no")
        );
    }

    #[test]
    fn test_bare_label_column() {
        let survey = sheet![["type", "name", "label"], ["text", "q", "Q"]];
        assert_eq!(
            decode(&survey).unwrap_err(),
            Error::invalid_label("survey", "label")
        );
    }
}
