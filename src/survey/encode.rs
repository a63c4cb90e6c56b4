//! Tree to rows.

use super::{is_begin, is_end};
use crate::columns::{resolve_columns, SURVEY_COLUMNS};
use crate::lang::{column_base, join_column};
use crate::model::{Attribute, Attributes, ChoiceList, Element, Group, Question};
use crate::sheet::{self, Record, Sheet, SURVEY_SHEET};
use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};

const TYPE: &str = "type";
const NAME: &str = "name";
const LABEL: &str = "label";

/// Output of [`encode_survey`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSurvey<'a> {
    /// Survey sheet with its resolved header row.
    pub sheet: Sheet,
    /// Lists referenced by at least one question, in order of first reference.
    pub referenced: Vec<&'a ChoiceList>,
}

/// Flattens `elements` into a survey sheet.
///
/// # Errors
///
/// - [`Error::UnknownChoiceList`] when a question references a list missing
///   from `lists`
/// - [`Error::InvalidElementType`] when a group type does not start with
///   `begin`, or a question type does
/// - [`Error::MissingColumn`] when no element carries a label, so the sheet
///   would lack its required `label` column
///
/// # Examples
///
/// ```rust
/// use cueform::survey::encode_survey;
/// use cueform::{Element, Group, Question};
/// use indexmap::IndexMap;
///
/// let elements: Vec<Element> = vec![Group::new("father")
///     .with_label("English (en)", "Father")
///     .with_child(Question::new("age", "integer").with_label("English (en)", "How old is your father?"))
///     .into()];
///
/// let lists = IndexMap::new();
/// let encoded = encode_survey(&elements, &lists).unwrap();
/// assert_eq!(encoded.sheet.rows[0], vec!["type", "name", "label::English (en)"]);
/// assert_eq!(encoded.sheet.rows[3], vec!["end_group", "", ""]);
/// ```
pub fn encode_survey<'a>(
    elements: &[Element],
    lists: &'a IndexMap<String, ChoiceList>,
) -> Result<EncodedSurvey<'a>> {
    let mut encoder = SurveyEncoder::new(lists);
    encoder.encode_elements(elements)?;
    encoder.finish()
}

/// Accumulator of one encode call.
struct SurveyEncoder<'a> {
    lists: &'a IndexMap<String, ChoiceList>,
    records: Vec<Record>,
    columns: IndexSet<String>,
    referenced: IndexMap<&'a str, &'a ChoiceList>,
}

impl<'a> SurveyEncoder<'a> {
    fn new(lists: &'a IndexMap<String, ChoiceList>) -> Self {
        let mut columns = IndexSet::new();
        columns.insert(TYPE.to_string());
        columns.insert(NAME.to_string());
        SurveyEncoder {
            lists,
            records: Vec::new(),
            columns,
            referenced: IndexMap::new(),
        }
    }

    fn encode_elements(&mut self, elements: &[Element]) -> Result<()> {
        for element in elements {
            match element {
                Element::Question(question) => self.encode_question(question)?,
                Element::Group(group) => self.encode_group(group)?,
            }
        }
        Ok(())
    }

    fn encode_question(&mut self, question: &Question) -> Result<()> {
        if is_begin(&question.question_type) || is_end(&question.question_type) {
            return Err(Error::invalid_element_type(
                &question.name,
                &question.question_type,
                "question types must not start with 'begin' or 'end'",
            ));
        }
        let type_cell = match &question.choices {
            Some(list_name) => {
                let lists = self.lists;
                let (name, list) = lists
                    .get_key_value(list_name.as_str())
                    .ok_or_else(|| Error::unknown_choice_list(&question.name, list_name))?;
                self.referenced.entry(name.as_str()).or_insert(list);
                format!("{} {}", question.question_type, list_name)
            }
            None => question.question_type.clone(),
        };
        self.push_record(&type_cell, &question.name, &question.attributes);
        Ok(())
    }

    fn encode_group(&mut self, group: &Group) -> Result<()> {
        if !is_begin(&group.group_type) {
            return Err(Error::invalid_element_type(
                &group.name,
                &group.group_type,
                "group types must start with 'begin'",
            ));
        }
        self.push_record(&group.group_type, &group.name, &group.attributes);
        self.encode_elements(&group.children)?;

        let mut end = Record::new();
        end.insert(TYPE.to_string(), group.end_type());
        self.records.push(end);
        Ok(())
    }

    fn push_record(&mut self, type_cell: &str, name: &str, attributes: &Attributes) {
        let mut record = Record::new();
        record.insert(TYPE.to_string(), type_cell.to_string());
        record.insert(NAME.to_string(), name.to_string());

        for (key, value) in attributes {
            match value {
                Attribute::Text(text) => {
                    if !text.is_empty() {
                        record.insert(key.clone(), text.clone());
                    }
                }
                Attribute::Labels(labels) => {
                    for (lang, text) in labels {
                        record.insert(join_column(key, lang), text.clone());
                    }
                }
            }
        }

        for column in record.keys() {
            if !self.columns.contains(column) {
                self.columns.insert(column.clone());
            }
        }
        self.records.push(record);
    }

    fn finish(self) -> Result<EncodedSurvey<'a>> {
        if !self.columns.iter().any(|column| column_base(column) == LABEL) {
            return Err(Error::missing_column(SURVEY_SHEET, LABEL));
        }
        let header = resolve_columns(self.columns, &SURVEY_COLUMNS);
        Ok(EncodedSurvey {
            sheet: sheet::from_records(header, &self.records),
            referenced: self.referenced.into_values().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> IndexMap<String, ChoiceList> {
        let mut lists = IndexMap::new();
        for list in [
            ChoiceList::new("yes_no")
                .with_entry("yes", [("English (en)", "Yes")])
                .with_entry("no", [("English (en)", "No")]),
            ChoiceList::new("unused").with_entry("x", [("English (en)", "X")]),
        ] {
            lists.insert(list.name.clone(), list);
        }
        lists
    }

    #[test]
    fn test_single_question() {
        let elements = vec![Question::new("family_name", "text")
            .with_label("English (en)", "What's your family name?")
            .into()];
        let lists = IndexMap::new();
        let encoded = encode_survey(&elements, &lists).unwrap();
        assert_eq!(
            encoded.sheet.rows,
            vec![
                vec!["type", "name", "label::English (en)"],
                vec!["text", "family_name", "What's your family name?"],
            ]
        );
        assert!(encoded.referenced.is_empty());
    }

    #[test]
    fn test_select_registers_list_once() {
        let lists = yes_no();
        let elements: Vec<Element> = vec![
            Question::new("likes_pizza", "select_one")
                .with_choices("yes_no")
                .with_label("English (en)", "Pizza?")
                .into(),
            Question::new("likes_pasta", "select_one")
                .with_choices("yes_no")
                .with_label("English (en)", "Pasta?")
                .into(),
        ];
        let encoded = encode_survey(&elements, &lists).unwrap();
        assert_eq!(encoded.sheet.rows[1][0], "select_one yes_no");
        let names: Vec<_> = encoded.referenced.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["yes_no"]);
    }

    #[test]
    fn test_missing_list() {
        let elements = vec![Question::new("q", "select_one").with_choices("nope").into()];
        assert_eq!(
            encode_survey(&elements, &yes_no()).unwrap_err(),
            Error::unknown_choice_list("q", "nope")
        );
    }

    #[test]
    fn test_columns_are_union_across_elements() {
        let elements: Vec<Element> = vec![
            Question::new("a", "text").with_label("en", "A").into(),
            Question::new("b", "text")
                .with_label("fr", "B")
                .with_attribute("relevant", "${a} != ''")
                .into(),
        ];
        let lists = IndexMap::new();
        let encoded = encode_survey(&elements, &lists).unwrap();
        assert_eq!(
            encoded.sheet.rows,
            vec![
                vec!["type", "name", "label::en", "label::fr", "relevant"],
                vec!["text", "a", "A", "", ""],
                vec!["text", "b", "", "B", "${a} != ''"],
            ]
        );
    }

    #[test]
    fn test_repeat_closing_row() {
        let elements = vec![Group::new("r")
            .with_type("begin repeat")
            .with_label("en", "Members")
            .into()];
        let lists = IndexMap::new();
        let encoded = encode_survey(&elements, &lists).unwrap();
        assert_eq!(encoded.sheet.rows[2][0], "end repeat");
    }

    #[test]
    fn test_unlabelled_form_has_no_label_column() {
        let elements = vec![Question::new("total", "calculate")
            .with_attribute("calculation", "1 + 1")
            .into()];
        assert_eq!(
            encode_survey(&elements, &IndexMap::new()).unwrap_err(),
            Error::missing_column("survey", "label")
        );
        assert_eq!(
            encode_survey(&[], &IndexMap::new()).unwrap_err(),
            Error::missing_column("survey", "label")
        );
    }

    #[test]
    fn test_one_label_is_enough() {
        let elements: Vec<Element> = vec![
            Question::new("total", "calculate")
                .with_attribute("calculation", "1 + 1")
                .into(),
            Question::new("show", "note").with_label("en", "Total: ${total}").into(),
        ];
        let lists = IndexMap::new();
        let encoded = encode_survey(&elements, &lists).unwrap();
        assert_eq!(encoded.sheet.rows[1], vec!["calculate", "total", "", "1 + 1"]);
    }

    #[test]
    fn test_group_type_must_open_with_begin() {
        let elements = vec![Group::new("g").with_type("group").with_label("en", "G").into()];
        assert_eq!(
            encode_survey(&elements, &IndexMap::new()).unwrap_err(),
            Error::invalid_element_type("g", "group", "group types must start with 'begin'")
        );
    }

    #[test]
    fn test_question_type_must_not_look_like_marker() {
        for question_type in ["begin_group", "end_group"] {
            let elements = vec![Question::new("q", question_type).with_label("en", "Q").into()];
            assert!(matches!(
                encode_survey(&elements, &IndexMap::new()),
                Err(Error::InvalidElementType { .. })
            ));
        }
    }
}
