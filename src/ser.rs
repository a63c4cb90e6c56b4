//! Configuration printing.
//!
//! This module provides the [`Printer`] that renders a [`ConfigFile`] or a
//! single [`ConfigValue`] as canonical configuration text.
//!
//! ## Overview
//!
//! The printer always produces the same text for the same tree:
//!
//! - **One field per line**: struct fields are never packed onto one line
//! - **Indentation**: one [`Indent`](crate::Indent) unit per nesting level, tabs by default
//! - **Trailing commas**: every list element is followed by a comma
//! - **Quote minimization**: labels and reference segments are bare when they are identifiers
//!
//! ## Usage
//!
//! ```rust
//! use cueform::{ConfigFile, ConfigStruct, FormOptions, Merge, Printer};
//!
//! let mut body = ConfigStruct::new();
//! body.push("type", "text");
//! body.push("name", "family_name");
//!
//! let mut file = ConfigFile::new("main");
//! file.imports.push("schema".to_string());
//! file.fields.push("family_name", Merge::new("schema", "Question", body));
//!
//! let options = FormOptions::new();
//! let mut printer = Printer::new(&options);
//! printer.print_file(&file);
//!
//! let text = printer.into_inner();
//! assert!(text.starts_with("package main\n"));
//! assert!(text.contains("family_name: schema.#Question & {\n\ttype: \"text\"\n"));
//! ```

use crate::value::{ConfigFile, ConfigStruct, ConfigValue};
use crate::FormOptions;

/// Renders configuration trees as text.
///
/// Created via [`Printer::new`]; the accumulated text is taken with
/// [`Printer::into_inner`].
pub struct Printer {
    output: String,
    indent_unit: String,
    indent_level: usize,
}

impl Printer {
    pub fn new(options: &FormOptions) -> Self {
        Printer {
            output: String::with_capacity(1024),
            indent_unit: options.indent.unit(),
            indent_level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Prints the package clause, the imports and every top-level field.
    pub fn print_file(&mut self, file: &ConfigFile) {
        self.output.push_str("package ");
        self.output.push_str(&file.package);
        self.output.push('\n');

        match file.imports.as_slice() {
            [] => {}
            [single] => {
                self.output.push_str("\nimport ");
                self.write_string(single);
                self.output.push('\n');
            }
            many => {
                self.output.push_str("\nimport (\n");
                for path in many {
                    self.output.push_str(&self.indent_unit);
                    self.write_string(path);
                    self.output.push('\n');
                }
                self.output.push_str(")\n");
            }
        }

        if !file.fields.is_empty() {
            self.output.push('\n');
        }
        for field in &file.fields {
            self.write_label(&field.label);
            self.output.push_str(": ");
            self.print_value(&field.value);
            self.output.push('\n');
        }
    }

    /// Prints one value at the current indentation level.
    pub fn print_value(&mut self, value: &ConfigValue) {
        match value {
            ConfigValue::String(s) => self.write_string(s),
            ConfigValue::List(items) => self.write_list(items),
            ConfigValue::Struct(fields) => self.write_struct(fields),
            ConfigValue::Reference(path) => self.write_reference(path),
            ConfigValue::Merge(merge) => {
                self.output.push_str(&merge.package);
                self.output.push_str(".#");
                self.output.push_str(&merge.definition);
                self.output.push_str(" & ");
                self.write_struct(&merge.body);
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_unit);
        }
    }

    fn write_struct(&mut self, fields: &ConfigStruct) {
        if fields.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent_level += 1;
        for field in fields {
            self.write_indent();
            self.write_label(&field.label);
            self.output.push_str(": ");
            self.print_value(&field.value);
            self.output.push('\n');
        }
        self.indent_level -= 1;
        self.write_indent();
        self.output.push('}');
    }

    fn write_list(&mut self, items: &[ConfigValue]) {
        if items.is_empty() {
            self.output.push_str("[]");
            return;
        }
        self.output.push_str("[\n");
        self.indent_level += 1;
        for item in items {
            self.write_indent();
            self.print_value(item);
            self.output.push_str(",\n");
        }
        self.indent_level -= 1;
        self.write_indent();
        self.output.push(']');
    }

    fn write_reference(&mut self, path: &[String]) {
        for (i, segment) in path.iter().enumerate() {
            if i > 0 {
                self.output.push('.');
            }
            self.write_label(segment);
        }
    }

    #[inline]
    fn write_label(&mut self, label: &str) {
        if is_identifier(label) {
            self.output.push_str(label);
        } else {
            self.write_string(label);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }
}

/// Returns `true` when `s` can be written as a bare label.
///
/// Keywords of the file header are always quoted.
#[inline]
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && s != "package"
        && s != "import"
}

/// Prints a whole file.
pub fn file_to_string(file: &ConfigFile, options: &FormOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print_file(file);
    printer.into_inner()
}

/// Prints a single value at indentation level zero.
pub fn value_to_string(value: &ConfigValue, options: &FormOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print_value(value);
    printer.into_inner()
}
