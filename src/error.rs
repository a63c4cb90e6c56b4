//! Error types for form decoding and encoding.
//!
//! Every failure is fatal to the conversion call that produced it: there is no
//! partial output. Errors carry the sheet, column, row or source position that
//! triggered them so callers can point the user at the offending cell or line.
//!
//! ## Error Categories
//!
//! - **Structural errors**: missing sheets or required columns, unbalanced
//!   `begin`/`end` markers, more than one settings row, element types that
//!   clash with the marker rule
//! - **Label errors**: a translatable column (`label`, `hint`, ...) without a
//!   `::<language>` suffix, a choice without any label
//! - **Reference errors**: a select question naming a list that does not exist
//! - **Configuration errors**: syntax errors with line/column information and
//!   shape errors with the path of the offending member
//!
//! ## Examples
//!
//! ```rust
//! use cueform::Error;
//!
//! let err = Error::invalid_label("survey", "label");
//! assert!(err.to_string().contains("no language code"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while converting a form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A required sheet is not present in the workbook
    #[error("xlsform structure is incorrect: missing sheet '{0}'")]
    MissingSheet(String),

    /// A sheet exists but has no header row
    #[error("xlsform structure is incorrect: sheet '{0}' is empty")]
    EmptySheet(String),

    /// A sheet header lacks a required column
    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// A translatable column was declared without a language tag
    #[error("found translatable column with no language code: '{column}' in sheet '{sheet}'")]
    InvalidLabel { sheet: String, column: String },

    /// Group markers do not pair up
    #[error("unbalanced group markers at row {row}: {msg}")]
    UnbalancedGroup { row: usize, msg: String },

    /// A choice entry carries no translation of its label
    #[error("choice '{entry}' in sheet '{sheet}' has no label")]
    MissingLabel { sheet: String, entry: String },

    /// An element type collides with the group marker rule
    #[error("element '{name}' has type '{element_type}': {msg}")]
    InvalidElementType {
        name: String,
        element_type: String,
        msg: String,
    },

    /// A select question references a list that does not exist
    #[error("question '{question}' references unknown choice list '{list}'")]
    UnknownChoiceList { question: String, list: String },

    /// The settings sheet holds more than one data row
    #[error("settings sheet must hold at most one data row, found {0}")]
    MultipleSettingsRows(usize),

    /// Syntax error in configuration text
    #[error("Syntax error at line {line}, column {col}:\n{context}\n{msg}{suggestion}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
        suggestion: String,
    },

    /// Unexpected end of configuration text
    #[error("Unexpected end of input at line {line}, column {col}\nExpected: {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// A configuration member does not match its declared shape
    #[error("invalid shape at '{path}': {msg}")]
    Shape { path: String, msg: String },
}

impl Error {
    /// Creates a label error for a translatable column without a language tag.
    pub fn invalid_label(sheet: &str, column: &str) -> Self {
        Error::InvalidLabel {
            sheet: sheet.to_string(),
            column: column.to_string(),
        }
    }

    /// Creates a missing column error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cueform::Error;
    ///
    /// let err = Error::missing_column("choices", "list_name");
    /// assert!(err.to_string().contains("list_name"));
    /// ```
    pub fn missing_column(sheet: &str, column: &str) -> Self {
        Error::MissingColumn {
            sheet: sheet.to_string(),
            column: column.to_string(),
        }
    }

    /// Creates an unbalanced group error for the given 1-based sheet row.
    pub fn unbalanced_group(row: usize, msg: &str) -> Self {
        Error::UnbalancedGroup {
            row,
            msg: msg.to_string(),
        }
    }

    /// Creates a label error for the choice `<list>.<code>`.
    pub fn missing_label(sheet: &str, list: &str, code: &str) -> Self {
        Error::MissingLabel {
            sheet: sheet.to_string(),
            entry: format!("{}.{}", list, code),
        }
    }

    pub fn invalid_element_type(name: &str, element_type: &str, msg: &str) -> Self {
        Error::InvalidElementType {
            name: name.to_string(),
            element_type: element_type.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unknown_choice_list(question: &str, list: &str) -> Self {
        Error::UnknownChoiceList {
            question: question.to_string(),
            list: list.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// Use [`Error::syntax_with_context`] for more detailed error messages.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cueform::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: String::new(),
            suggestion: String::new(),
        }
    }

    /// Creates a syntax error with the offending source line and an optional suggestion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cueform::Error;
    ///
    /// let err = Error::syntax_with_context(
    ///     3,
    ///     7,
    ///     "expected ':' after label",
    ///     "name \"age\"",
    ///     Some("Did you mean 'name: \"age\"'?"),
    /// );
    /// assert!(err.to_string().contains("Help:"));
    /// ```
    pub fn syntax_with_context(
        line: usize,
        col: usize,
        msg: &str,
        context: &str,
        suggestion: Option<&str>,
    ) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
            suggestion: suggestion
                .map(|s| format!("\nHelp: {}", s))
                .unwrap_or_default(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates a shape error for the configuration member at `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cueform::Error;
    ///
    /// let err = Error::shape("father.children[0]", "missing field 'type'");
    /// assert!(err.to_string().contains("father.children[0]"));
    /// ```
    pub fn shape<T: fmt::Display>(path: &str, msg: T) -> Self {
        Error::Shape {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_label_names_sheet_and_column() {
        let err = Error::invalid_label("choices", "label");
        let message = err.to_string();
        assert!(message.contains("'label'"));
        assert!(message.contains("'choices'"));
    }

    #[test]
    fn test_suggestion_is_optional() {
        let err = Error::syntax_with_context(1, 1, "bad", "x", None);
        assert!(!err.to_string().contains("Help:"));
    }

    #[test]
    fn test_missing_label_names_list_and_code() {
        let err = Error::missing_label("choices", "yes_no", "maybe");
        assert!(err.to_string().contains("'yes_no.maybe'"));
    }

    #[test]
    fn test_unbalanced_group_reports_row() {
        let err = Error::unbalanced_group(7, "end marker without matching begin");
        assert!(err.to_string().contains("row 7"));
    }
}
