//! Configuration parsing.
//!
//! This module provides the [`Parser`] that reads configuration text into a
//! [`ConfigFile`].
//!
//! ## Overview
//!
//! - **Single-pass parsing**: recursive descent over the input, no backtracking
//! - **Comments**: `//` comments run to the end of the line and are skipped
//! - **Optional commas**: fields and list elements may be separated by commas,
//!   newlines, or both
//! - **Error reporting**: syntax errors carry line/column information and the
//!   offending source line
//!
//! ## Usage
//!
//! ```rust
//! use cueform::Parser;
//!
//! let text = r#"
//! package main
//!
//! import "schema"
//!
//! // a single question
//! family_name: schema.#Question & {
//!     type: "text"
//!     name: "family_name"
//! }
//! "#;
//!
//! let file = Parser::new(text).parse_file().unwrap();
//! assert_eq!(file.package, "main");
//! assert_eq!(file.imports, vec!["schema".to_string()]);
//! assert_eq!(file.fields.len(), 1);
//! ```

use crate::value::{ConfigFile, ConfigStruct, ConfigValue, Field, Merge};
use crate::{Error, Result};

/// The configuration text parser.
///
/// Created via [`Parser::new`]; consumed by [`Parser::parse_file`].
pub struct Parser<'de> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'de> Parser<'de> {
    pub fn new(input: &'de str) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.input[self.position..].chars().next() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Skips whitespace on the same line only (no newlines)
    fn skip_whitespace_same_line(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Skips whitespace, newlines and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.next_char();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                }
                _ => break,
            }
        }
    }

    /// Source line under the cursor with a caret at the current column.
    fn context(&self) -> String {
        let start = self.input[..self.position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let end = self.input[self.position..]
            .find('\n')
            .map_or(self.input.len(), |i| self.position + i);
        format!(
            "{}\n{}^",
            &self.input[start..end],
            " ".repeat(self.column.saturating_sub(1))
        )
    }

    fn error(&self, msg: &str, suggestion: Option<&str>) -> Error {
        Error::syntax_with_context(self.line, self.column, msg, &self.context(), suggestion)
    }

    fn eof(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected)
    }

    fn expect(&mut self, expected: char, suggestion: Option<&str>) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.next_char();
                Ok(())
            }
            Some(_) => Err(self.error(&format!("Expected '{}'", expected), suggestion)),
            None => Err(self.eof(&format!("'{}'", expected))),
        }
    }

    /// Parses a whole file: package clause, imports, then top-level fields.
    pub fn parse_file(mut self) -> Result<ConfigFile> {
        self.skip_trivia();
        if self.at_end() {
            return Err(self.eof("package clause"));
        }
        let keyword = self.parse_ident()?;
        if keyword != "package" {
            return Err(self.error(
                &format!("Expected 'package', found '{}'", keyword),
                Some("Configuration files start with a package clause, e.g. 'package main'"),
            ));
        }
        self.skip_whitespace_same_line();
        let mut file = ConfigFile::new(&self.parse_ident()?);

        loop {
            self.skip_trivia();
            if self.at_end() {
                break;
            }
            if self.peek_keyword("import") {
                self.parse_imports(&mut file.imports)?;
                continue;
            }
            let field = self.parse_field()?;
            file.fields.fields.push(field);
            self.skip_separator();
        }

        Ok(file)
    }

    /// Returns `true` when the input continues with `keyword` as a whole word.
    fn peek_keyword(&self, keyword: &str) -> bool {
        let rest = &self.input[self.position..];
        rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_ident_continue)
    }

    fn parse_imports(&mut self, imports: &mut Vec<String>) -> Result<()> {
        for _ in 0.."import".len() {
            self.next_char();
        }
        self.skip_whitespace_same_line();
        if self.peek_char() == Some('(') {
            self.next_char();
            loop {
                self.skip_trivia();
                match self.peek_char() {
                    Some(')') => {
                        self.next_char();
                        return Ok(());
                    }
                    Some('"') => imports.push(self.parse_string()?),
                    Some(_) => return Err(self.error("Expected import path string", None)),
                    None => return Err(self.eof("')'")),
                }
            }
        }
        match self.peek_char() {
            Some('"') => {
                imports.push(self.parse_string()?);
                Ok(())
            }
            Some(_) => Err(self.error(
                "Expected import path string",
                Some("Quote the import path, e.g. 'import \"schema\"'"),
            )),
            None => Err(self.eof("import path")),
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        let start = self.position;
        match self.peek_char() {
            Some(ch) if is_ident_start(ch) => {
                self.next_char();
            }
            Some(_) => return Err(self.error("Expected identifier", None)),
            None => return Err(self.eof("identifier")),
        }
        while let Some(ch) = self.peek_char() {
            if !is_ident_continue(ch) {
                break;
            }
            self.next_char();
        }
        Ok(self.input[start..self.position].to_string())
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect('"', None)?;
        let mut result = String::new();

        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\n' => {
                    return Err(Error::syntax(
                        self.line - 1,
                        self.column,
                        "Newline in string literal",
                    ))
                }
                '\\' => match self.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(other) => {
                        // Unknown escape - preserve literally (lenient parsing)
                        result.push('\\');
                        result.push(other);
                    }
                    None => return Err(self.eof("end of string")),
                },
                other => result.push(other),
            }
        }
        Err(self.eof("closing '\"'"))
    }

    /// Reads the four hex digits of a `\uXXXX` escape.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.next_char() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(Error::syntax(
                        self.line,
                        self.column,
                        "Invalid unicode escape sequence (expected 4 hex digits)",
                    ))
                }
            }
        }
        let code_point = u32::from_str_radix(&hex, 16)
            .map_err(|_| Error::syntax(self.line, self.column, "Invalid hex in unicode escape"))?;
        char::from_u32(code_point)
            .ok_or_else(|| Error::syntax(self.line, self.column, "Invalid unicode code point"))
    }

    fn parse_label(&mut self) -> Result<String> {
        match self.peek_char() {
            Some('"') => self.parse_string(),
            Some(ch) if is_ident_start(ch) => self.parse_ident(),
            Some(_) => Err(self.error("Expected field label", None)),
            None => Err(self.eof("field label")),
        }
    }

    fn parse_field(&mut self) -> Result<Field> {
        let label = self.parse_label()?;
        self.skip_whitespace_same_line();
        if self.peek_char() != Some(':') {
            let suggestion = format!("Did you mean '{}: ...'?", label);
            return Err(self.error("Expected ':' after label", Some(&suggestion)));
        }
        self.next_char();
        let value = self.parse_value()?;
        Ok(Field { label, value })
    }

    /// Skips trivia and at most one comma after a field or list element.
    fn skip_separator(&mut self) {
        self.skip_trivia();
        if self.peek_char() == Some(',') {
            self.next_char();
        }
    }

    fn parse_value(&mut self) -> Result<ConfigValue> {
        self.skip_trivia();
        match self.peek_char() {
            Some('"') => Ok(ConfigValue::String(self.parse_string()?)),
            Some('[') => self.parse_list(),
            Some('{') => Ok(ConfigValue::Struct(self.parse_struct()?)),
            Some(ch) if is_ident_start(ch) => self.parse_path(),
            Some(ch) => Err(self.error(&format!("Unexpected character '{}'", ch), None)),
            None => Err(self.eof("value")),
        }
    }

    fn parse_struct(&mut self) -> Result<ConfigStruct> {
        self.expect('{', None)?;
        let mut fields = ConfigStruct::new();
        loop {
            self.skip_trivia();
            match self.peek_char() {
                Some('}') => {
                    self.next_char();
                    return Ok(fields);
                }
                Some(_) => {
                    fields.fields.push(self.parse_field()?);
                    self.skip_separator();
                }
                None => return Err(self.eof("'}'")),
            }
        }
    }

    fn parse_list(&mut self) -> Result<ConfigValue> {
        self.expect('[', None)?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek_char() {
                Some(']') => {
                    self.next_char();
                    return Ok(ConfigValue::List(items));
                }
                Some(_) => {
                    items.push(self.parse_value()?);
                    self.skip_separator();
                }
                None => return Err(self.eof("']'")),
            }
        }
    }

    /// Parses a reference path, or a merge when the path continues with `.#`.
    fn parse_path(&mut self) -> Result<ConfigValue> {
        let head = self.parse_ident()?;
        let mut path = vec![head];

        while self.peek_char() == Some('.') {
            self.next_char();
            match self.peek_char() {
                Some('#') if path.len() == 1 => {
                    self.next_char();
                    let definition = self.parse_ident()?;
                    self.skip_whitespace_same_line();
                    self.expect(
                        '&',
                        Some("Definitions are merged with a struct, e.g. 'schema.#Question & { ... }'"),
                    )?;
                    self.skip_trivia();
                    let body = self.parse_struct()?;
                    return Ok(ConfigValue::Merge(Merge {
                        package: path.remove(0),
                        definition,
                        body,
                    }));
                }
                Some('"') => path.push(self.parse_string()?),
                Some(ch) if is_ident_start(ch) => path.push(self.parse_ident()?),
                Some(_) => return Err(self.error("Expected path segment after '.'", None)),
                None => return Err(self.eof("path segment")),
            }
        }

        Ok(ConfigValue::Reference(path))
    }
}

#[inline]
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

#[inline]
fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Parses a whole configuration file.
pub fn parse_file(input: &str) -> Result<ConfigFile> {
    Parser::new(input).parse_file()
}
