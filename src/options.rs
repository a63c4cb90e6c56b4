//! Configuration options for form conversion.
//!
//! This module provides types to customize both outputs:
//!
//! - [`FormOptions`]: main configuration struct
//! - [`Indent`]: indentation of printed configuration text
//!
//! ## Examples
//!
//! ```rust
//! use cueform::{FormOptions, Indent};
//!
//! let options = FormOptions::new()
//!     .with_schema_package("github.com/acme/forms/schema")
//!     .with_indent(Indent::Spaces(4));
//!
//! assert_eq!(options.schema_alias(), "schema");
//! ```

/// Indentation used when printing configuration text.
///
/// # Examples
///
/// ```rust
/// use cueform::Indent;
///
/// assert_eq!(Indent::Tab.unit(), "\t");
/// assert_eq!(Indent::Spaces(2).unit(), "  ");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// Returns the text of one indentation level.
    #[must_use]
    pub fn unit(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Configuration options for form conversion.
///
/// Controls the package and schema import of printed configuration text, its
/// indentation, and the cosmetic column widths of encoded sheets.
///
/// # Examples
///
/// ```rust
/// use cueform::FormOptions;
///
/// // Defaults: package `main`, schema package `schema`, tab indentation
/// let options = FormOptions::new();
/// assert_eq!(options.package, "main");
///
/// let options = FormOptions::new()
///     .with_package("forms")
///     .with_column_widths(25.0, 60.0);
/// assert_eq!(options.label_column_width, 60.0);
/// ```
#[derive(Clone, Debug)]
pub struct FormOptions {
    /// Package clause of printed configuration.
    pub package: String,
    /// Import path of the package declaring `#Question`, `#Group`, `#Choices`
    /// and `#Settings`.
    pub schema_package: String,
    pub indent: Indent,
    /// Display width of every encoded column.
    pub column_width: f64,
    /// Display width of the first label column of the survey sheet.
    pub label_column_width: f64,
}

impl Default for FormOptions {
    fn default() -> Self {
        FormOptions {
            package: "main".to_string(),
            schema_package: "schema".to_string(),
            indent: Indent::default(),
            column_width: 30.0,
            label_column_width: 50.0,
        }
    }
}

impl FormOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = package.to_string();
        self
    }

    /// Sets the schema import path.
    ///
    /// Definitions are referenced through the last path segment, so
    /// `github.com/acme/forms/schema` is referenced as `schema.#Question`.
    #[must_use]
    pub fn with_schema_package(mut self, path: &str) -> Self {
        self.schema_package = path.to_string();
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_column_widths(mut self, column_width: f64, label_column_width: f64) -> Self {
        self.column_width = column_width;
        self.label_column_width = label_column_width;
        self
    }

    /// Identifier the schema package is referenced by.
    #[must_use]
    pub fn schema_alias(&self) -> &str {
        import_alias(&self.schema_package)
    }
}

/// Last segment of an import path, ignoring any `@version` or `:name` suffix.
pub(crate) fn import_alias(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    let last = last.split('@').next().unwrap_or(last);
    match last.split_once(':') {
        Some((_, name)) if !name.is_empty() => name,
        Some((segment, _)) => segment,
        None => last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_alias() {
        assert_eq!(import_alias("test"), "test");
        assert_eq!(import_alias("github.com/acme/forms/schema"), "schema");
        assert_eq!(import_alias("example.com/forms@v1"), "forms");
        assert_eq!(import_alias("example.com/forms:xlsform"), "xlsform");
    }

    #[test]
    fn test_defaults() {
        let options = FormOptions::default();
        assert_eq!(options.indent, Indent::Tab);
        assert_eq!(options.column_width, 30.0);
        assert_eq!(options.schema_alias(), "schema");
    }
}
