//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Definitions (functions, extern functions, type aliases and classes)
//! - Statement parsing (variable declarations, assignments, control flow)
//! - Expression parsing (binary ops, function calls, literals)
//! - Type parsing for type annotations
//!
//! Names are bound against the open scopes while parsing. Whatever is still
//! open afterwards is closed by the resolution passes that `parse` runs.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod restricted;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
