//! Error types and error handling for the front end.
//!
//! Every stage reports failures through a single [`errors::Error`] carrying:
//!
//! - the specific failure as an [`errors::ErrorImpl`] variant
//! - the source position it was detected at
//! - an [`errors::ErrorKind`] (lexical, parse or semantic)
//! - an optional rendering tip
//!
//! The first error aborts the whole pipeline; nothing is batched or recovered.

pub mod errors;
