//! Resolution passes run over a freshly parsed module.
//!
//! Parsing leaves forward references open: types used before their
//! definition, calls to functions defined further down, and number literals
//! whose type depends on where they appear. Each pass closes one of these,
//! and each relies on the ones before it:
//!
//! - collector: records every type and function definition by name
//! - type_resolver: resolves every named type in place
//! - function_resolver: binds symbols to function signatures
//! - number_resolver: gives every number literal a concrete type and value

pub mod collector;
pub mod function_resolver;
pub mod number_resolver;
pub mod resolver;
pub mod type_resolver;
