/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The expression and statement enums and the `Node` view
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the statement nodes and scopes
/// - types: Types, variables and function signatures shared across the tree
/// - visitor: The `Visitor` trait and the walk functions used by the passes
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod visitor;

#[cfg(test)]
mod tests;
