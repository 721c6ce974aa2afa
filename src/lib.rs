#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    ast::statements::RestrictedBlockStmt,
    errors::errors::{Error, ErrorTip},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;

extern crate regex;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Covers both spans, from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// One source file of one module, ready to be parsed.
///
/// The file name only shows up in diagnostics; the module name prefixes every
/// mangled function name.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    file: Rc<String>,
    source: String,
}

impl Module {
    pub fn new(name: &str, file: &str, source: &str) -> Self {
        Module {
            name: name.to_string(),
            file: Rc::new(file.to_string()),
            source: source.to_string(),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_file(&self) -> &str {
        &self.file
    }

    pub fn get_source(&self) -> &str {
        &self.source
    }

    /// Lexes, parses and resolves the module. The returned block has every
    /// type resolved and every function bound to its signature.
    #[tracing::instrument(skip_all, fields(module = %self.name, file = %self.file))]
    pub fn parse(&self) -> Result<RestrictedBlockStmt, Error> {
        parser::parser::parse(&self.name, &self.file, &self.source)
    }
}

pub fn get_line_at_position(source: &str, position: &Position) -> Option<String> {
    if position.line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(position.line as usize - 1)
        .map(|line| line.trim_end_matches('\r').to_string())
}

/// Renders an error against the source it came from.
///
/// ```text
/// Error: UnknownType (cannot use undefined type 'Bogus')
/// -> main.seam
///   |
/// 3 | x: Bogus = 1
///   | ---^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let position = error.get_position();
    let line_number = position.line.to_string();
    let padding = line_number.len() + 2;

    let mut output = String::new();

    if let ErrorTip::None = error.get_tip() {
        output.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_message()
        ));
    } else {
        output.push_str(&format!(
            "Error: {} ({}; {})\n",
            error.get_error_name(),
            error.get_message(),
            error.get_tip()
        ));
    }
    output.push_str(&format!("-> {}\n", error.get_file().unwrap_or("<source>")));
    output.push_str(&format!("{:>padding$}\n", "|"));

    if let Some(line_text) = get_line_at_position(source, position) {
        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
        output.push_str(&format!("{} | {}\n", line_number, line_text_removed.trim_end()));

        let arrows = (position.column as usize)
            .saturating_sub(removed_whitespace)
            .max(1);
        output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    }

    output
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::errors::errors::{Error, ErrorImpl};
    use crate::Position;

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond line\n\nTesting { }\n";

        let line = super::get_line_at_position(source, &Position::new(1, 10));
        assert_eq!(line.as_deref(), Some("Hello, world!"));

        let line = super::get_line_at_position(source, &Position::new(4, 8));
        assert_eq!(line.as_deref(), Some("Testing { }"));

        assert_eq!(super::get_line_at_position(source, &Position::new(0, 1)), None);
        assert_eq!(super::get_line_at_position(source, &Position::new(9, 1)), None);
    }

    #[test]
    fn test_format_error() {
        let source = "fn main() {\n    x: Bogus = 1\n}\n";
        let error = Error::new(
            ErrorImpl::UnknownType {
                type_: "Bogus".to_string(),
            },
            Position::new(2, 8),
        )
        .with_file(&Rc::new("main.seam".to_string()));

        let rendered = super::format_error(&error, source);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnknownType (cannot use undefined type 'Bogus')");
        assert_eq!(lines[1], "-> main.seam");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | x: Bogus = 1");
        assert_eq!(lines[4], "  | ---^");
    }

    #[test]
    fn test_module_accessors() {
        let module = super::Module::new("main", "main.seam", "fn main() {}");
        assert_eq!(module.get_name(), "main");
        assert_eq!(module.get_file(), "main.seam");
        assert_eq!(module.get_source(), "fn main() {}");
    }
}
