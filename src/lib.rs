//! # cueform
//!
//! A bidirectional transcoder between XLSForm-style survey workbooks and a
//! CUE-like declarative form configuration.
//!
//! ## The two shapes
//!
//! A survey workbook stores a form as rows. The `survey` sheet is a flattened
//! pre-order walk of the form tree with explicit `begin_group`/`end_group`
//! marker rows, the `choices` sheet holds the shared option lists that select
//! questions refer to by name, and the `settings` sheet holds one row of
//! form-level values. Translations are spread across repeated columns such as
//! `label::English (en)` and `label::French (fr)`.
//!
//! The configuration form is a tree. Groups nest their children, translations
//! collapse into one map per field, and every member is typed through a
//! schema-qualified definition such as `schema.#Question & { ... }`.
//!
//! ## Key Features
//!
//! - **Lossless round trips**: `decode(encode(D)) == D` up to column order and
//!   empty cells
//! - **Deterministic sheets**: headers follow a canonical column order, so the
//!   same form always produces the same rows
//! - **Strict structure**: unbalanced group markers, untagged translatable
//!   columns and dangling choice references are errors, never silent drops
//! - **Serde Compatible**: model and workbook types derive `Serialize` and
//!   `Deserialize`
//!
//! ## Quick Start
//!
//! ```rust
//! use cueform::{decode, from_str, sheet, to_string, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.insert_sheet(
//!     "survey",
//!     sheet![
//!         ["type", "name", "label::English (en)"],
//!         ["begin_group", "father", "Father"],
//!         ["integer", "age", "How old is your father?"],
//!         ["end_group"],
//!     ],
//! );
//!
//! // Rows to configuration text
//! let text = to_string(&workbook).unwrap();
//! assert!(text.contains("father: schema.#Group & {"));
//!
//! // And back
//! let back = from_str(&text).unwrap();
//! assert_eq!(decode(&back).unwrap(), decode(&workbook).unwrap());
//! ```
//!
//! ## Working with the model
//!
//! [`decode`] and [`encode`] stop at the in-memory [`SurveyDocument`], which
//! is the place to inspect or rewrite a form programmatically:
//!
//! ```rust
//! use cueform::{decode, encode, sheet, Element, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.insert_sheet(
//!     "survey",
//!     sheet![
//!         ["type", "name", "label::English (en)"],
//!         ["select_one yes_no", "likes_pizza", "Do you like pizza?"],
//!     ],
//! );
//! workbook.insert_sheet(
//!     "choices",
//!     sheet![
//!         ["list_name", "name", "label::English (en)"],
//!         ["yes_no", "yes", "Yes"],
//!         ["yes_no", "no", "No"],
//!     ],
//! );
//!
//! let document = decode(&workbook).unwrap();
//! let Element::Question(question) = &document.elements[0] else { unreachable!() };
//! assert_eq!(question.question_type, "select_one");
//! assert_eq!(question.choices.as_deref(), Some("yes_no"));
//!
//! let encoded = encode(&document).unwrap();
//! assert_eq!(encoded.sheet("choices").unwrap().data_rows().len(), 2);
//! ```
//!
//! ## Conversion Pipeline
//!
//! workbook sheets → [`choices::ChoiceTable`] → [`survey::decode_survey`] →
//! [`SurveyDocument`] → [`document::to_config`] → [`ConfigFile`] →
//! [`Printer`] → text, and the reverse through [`Parser`],
//! [`document::from_config`] and [`survey::encode_survey`].
//!
//! Reading and writing the spreadsheet container itself is left to the
//! caller; [`Workbook`] is the plain-data shape exchanged with it.

pub mod choices;
pub mod columns;
pub mod de;
pub mod document;
pub mod error;
pub mod lang;
pub mod macros;
pub mod map;
pub mod model;
pub mod options;
pub mod ser;
pub mod settings;
pub mod sheet;
pub mod survey;
pub mod value;

pub use de::Parser;
pub use error::{Error, Result};
pub use map::LabelMap;
pub use model::{
    Attribute, Attributes, ChoiceEntry, ChoiceList, Element, Group, Question, Settings,
    SurveyDocument,
};
pub use options::{FormOptions, Indent};
pub use ser::Printer;
pub use sheet::{Sheet, Workbook};
pub use value::{ConfigFile, ConfigStruct, ConfigValue, Field, Merge};

use choices::ChoiceTable;
use lang::column_base;
use log::debug;
use sheet::{CHOICES_SHEET, SETTINGS_SHEET, SURVEY_SHEET};
use std::io;

/// Decode a workbook into a [`SurveyDocument`].
///
/// The `survey` sheet is required; `choices` and `settings` are optional.
///
/// # Errors
///
/// Returns an error if a sheet is malformed, group markers do not pair up, or
/// a select question names a list the `choices` sheet does not define.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(workbook: &Workbook) -> Result<SurveyDocument> {
    let survey = workbook
        .sheet(SURVEY_SHEET)
        .ok_or_else(|| Error::MissingSheet(SURVEY_SHEET.to_string()))?;

    let choices = match workbook.sheet(CHOICES_SHEET) {
        Some(sheet) => ChoiceTable::from_sheet(sheet)?,
        None => {
            debug!(sheet = CHOICES_SHEET; "Optional sheet is absent");
            ChoiceTable::new()
        }
    };

    let settings = match workbook.sheet(SETTINGS_SHEET) {
        Some(sheet) => settings::lift(sheet)?,
        None => {
            debug!(sheet = SETTINGS_SHEET; "Optional sheet is absent");
            None
        }
    };

    let elements = survey::decode_survey(survey, &choices)?;
    Ok(SurveyDocument {
        elements,
        choices: choices.into_lists(),
        settings,
    })
}

/// Encode a [`SurveyDocument`] into a workbook with default column widths.
///
/// # Errors
///
/// Returns an error if a question references a list the document does not hold,
/// no element carries a label, a choice has no label, or an element type clashes with
/// the group marker rule.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(document: &SurveyDocument) -> Result<Workbook> {
    encode_with_options(document, &FormOptions::default())
}

/// Encode a [`SurveyDocument`] into a workbook with custom options.
///
/// Only choice lists referenced by a question are written. The `choices` and
/// `settings` sheets are omitted when they would be empty.
///
/// # Examples
///
/// ```rust
/// use cueform::{encode_with_options, FormOptions, Question, SurveyDocument};
///
/// let mut document = SurveyDocument::new();
/// document
///     .elements
///     .push(Question::new("age", "integer").with_label("English (en)", "Age").into());
///
/// let options = FormOptions::new().with_column_widths(20.0, 40.0);
/// let workbook = encode_with_options(&document, &options).unwrap();
/// let survey = workbook.sheet("survey").unwrap();
///
/// assert_eq!(survey.column_width(0), Some(20.0));
/// assert_eq!(survey.column_width(2), Some(40.0));
/// assert!(workbook.sheet("choices").is_none());
/// ```
///
/// # Errors
///
/// Returns an error if a question references a list the document does not hold,
/// no element carries a label, a choice has no label, or an element type clashes with
/// the group marker rule.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(document: &SurveyDocument, options: &FormOptions) -> Result<Workbook> {
    let encoded = survey::encode_survey(&document.elements, &document.choices)?;
    let mut workbook = Workbook::new();

    let mut survey_sheet = encoded.sheet;
    survey_sheet.set_default_width(options.column_width);
    let label_column = survey_sheet
        .header()
        .and_then(|header| header.iter().position(|column| column_base(column) == "label"));
    if let Some(index) = label_column {
        survey_sheet.set_column_width(index, options.label_column_width);
    }
    workbook.insert_sheet(SURVEY_SHEET, survey_sheet);

    if encoded.referenced.is_empty() {
        debug!(sheet = CHOICES_SHEET; "No referenced choice lists, omitting sheet");
    } else {
        let mut choices_sheet = choices::encode_choices(encoded.referenced.iter().copied())?;
        choices_sheet.set_default_width(options.column_width);
        workbook.insert_sheet(CHOICES_SHEET, choices_sheet);
    }

    match &document.settings {
        Some(form_settings) if !form_settings.is_empty() => {
            let mut settings_sheet = settings::lower(form_settings);
            settings_sheet.set_default_width(options.column_width);
            workbook.insert_sheet(SETTINGS_SHEET, settings_sheet);
        }
        _ => debug!(sheet = SETTINGS_SHEET; "No settings, omitting sheet"),
    }

    Ok(workbook)
}

/// Convert a workbook to configuration text.
///
/// # Examples
///
/// ```rust
/// use cueform::{sheet, to_string, Workbook};
///
/// let mut workbook = Workbook::new();
/// workbook.insert_sheet(
///     "survey",
///     sheet![
///         ["type", "name", "label::English (en)"],
///         ["text", "family_name", "What's your family name?"],
///     ],
/// );
///
/// let text = to_string(&workbook).unwrap();
/// assert!(text.starts_with("package main\n\nimport \"schema\"\n"));
/// assert!(text.contains("\tlabel: {\n\t\t\"English (en)\": \"What's your family name?\"\n\t}\n"));
/// ```
///
/// # Errors
///
/// Returns an error if the workbook cannot be decoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(workbook: &Workbook) -> Result<String> {
    to_string_with_options(workbook, &FormOptions::default())
}

/// Convert a workbook to configuration text with custom options.
///
/// # Examples
///
/// ```rust
/// use cueform::{sheet, to_string_with_options, FormOptions, Indent, Workbook};
///
/// let mut workbook = Workbook::new();
/// workbook.insert_sheet(
///     "survey",
///     sheet![["type", "name", "label::en"], ["note", "intro", "Welcome"]],
/// );
///
/// let options = FormOptions::new()
///     .with_package("forms")
///     .with_schema_package("example.com/xlsform")
///     .with_indent(Indent::Spaces(2));
/// let text = to_string_with_options(&workbook, &options).unwrap();
///
/// assert!(text.starts_with("package forms\n"));
/// assert!(text.contains("intro: xlsform.#Question & {\n  type: \"note\"\n"));
/// ```
///
/// # Errors
///
/// Returns an error if the workbook cannot be decoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(workbook: &Workbook, options: &FormOptions) -> Result<String> {
    let document = decode(workbook)?;
    let file = document::to_config(&document, options);
    Ok(ser::file_to_string(&file, options))
}

/// Write a workbook as configuration text.
///
/// # Errors
///
/// Returns an error if the workbook cannot be decoded or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, workbook: &Workbook) -> Result<()>
where
    W: io::Write,
{
    let text = to_string(workbook)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Convert configuration text to a workbook.
///
/// # Examples
///
/// ```rust
/// use cueform::from_str;
///
/// let text = r#"
/// package main
///
/// import "schema"
///
/// family_name: schema.#Question & {
///     type: "text"
///     name: "family_name"
///     label: { "English (en)": "What's your family name?" }
/// }
/// "#;
///
/// let workbook = from_str(text).unwrap();
/// let survey = workbook.sheet("survey").unwrap();
/// assert_eq!(survey.rows[0], vec!["type", "name", "label::English (en)"]);
/// assert_eq!(survey.rows[1], vec!["text", "family_name", "What's your family name?"]);
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid configuration, a member does not
/// match its definition, or a choice reference dangles. Syntax errors include
/// line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Workbook> {
    from_str_with_options(s, &FormOptions::default())
}

/// Convert configuration text to a workbook with custom options.
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: &FormOptions) -> Result<Workbook> {
    let file = de::parse_file(s)?;
    let document = document::from_config(&file)?;
    encode_with_options(&document, options)
}

/// Read configuration text from an I/O stream and convert it to a workbook.
///
/// # Errors
///
/// Returns an error if reading fails or the text cannot be converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Workbook>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet;

    fn pizza_workbook() -> Workbook {
        let mut workbook = Workbook::new();
        workbook.insert_sheet(
            SURVEY_SHEET,
            sheet![
                ["type", "name", "label::English (en)"],
                ["select_one yes_no", "likes_pizza", "Do you like pizza?"],
            ],
        );
        workbook.insert_sheet(
            CHOICES_SHEET,
            sheet![
                ["list_name", "name", "label::English (en)"],
                ["yes_no", "yes", "Yes"],
                ["yes_no", "no", "No"],
                ["unused", "x", "X"],
            ],
        );
        workbook.insert_sheet(
            SETTINGS_SHEET,
            sheet![["form_title", "version"], ["Pizza", "1"]],
        );
        workbook
    }

    #[test]
    fn test_missing_survey_sheet() {
        assert_eq!(
            decode(&Workbook::new()).unwrap_err(),
            Error::MissingSheet("survey".to_string())
        );
    }

    #[test]
    fn test_decode_keeps_every_list() {
        let document = decode(&pizza_workbook()).unwrap();
        assert_eq!(document.choices.len(), 2);
        assert_eq!(document.settings.as_ref().and_then(|s| s.get("version")), Some("1"));
    }

    #[test]
    fn test_encode_prunes_unreferenced_lists() {
        let document = decode(&pizza_workbook()).unwrap();
        let workbook = encode(&document).unwrap();
        let choices = workbook.sheet(CHOICES_SHEET).unwrap();
        assert_eq!(choices.data_rows().len(), 2);
        assert!(choices.data_rows().iter().all(|row| row[0] == "yes_no"));
    }

    #[test]
    fn test_text_round_trip() {
        let workbook = pizza_workbook();
        let text = to_string(&workbook).unwrap();
        let back = from_str(&text).unwrap();
        assert_eq!(
            decode(&back).unwrap(),
            {
                let mut document = decode(&workbook).unwrap();
                document.choices.shift_remove("unused");
                document
            }
        );
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &pizza_workbook()).unwrap();
        let workbook = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), vec!["survey", "choices", "settings"]);
    }
}
