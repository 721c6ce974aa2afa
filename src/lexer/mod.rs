//! Lexical analysis module for the front end.
//!
//! This module contains the lexer that turns source text into positioned
//! tokens. It handles:
//!
//! - Whitespace, line comments (`//`) and long comments (`/// ... ///`)
//! - Keywords versus identifiers (keywords must be all lowercase, no `_`)
//! - Decimal and `0x` hexadecimal numbers with `_` separators
//! - String literals with escapes
//! - `@attribute` markers checked against the allow-list
//! - Symbols by maximal munch

pub mod lexer;
pub mod tokens;
