//! Tree walking for the resolution passes.
//!
//! Every concrete node kind has its own `visit_*` handler. A handler that is
//! not overridden hands the node, as a [`Node`] view, to the handler of the
//! category above it:
//!
//! ```text
//! node
//! ├── expr ── literal ── bool, string, number
//! │        └─ variable, symbol, call, unary, binary
//! ├── stmt ── expression_stmt, return, var_decl, assignment, if, while, for, block
//! │        └─ restricted ── restricted_block, fn_decl, extern_fn
//! │                      └─ type_definition ── alias_type, class_type
//! ├── signature
//! └── type
//! ```
//!
//! So overriding `visit_expr` covers every expression that has no handler of
//! its own. Each handler returns whether the walk should go on into the
//! node's children; the default is `true`.

use crate::errors::errors::Error;

use super::{
    ast::{Expr, Node, RestrictedStmt, Stmt},
    expressions::{
        BinaryExpr, BoolExpr, CallExpr, NumberExpr, StringExpr, SymbolExpr, UnaryExpr,
        VariableExpr,
    },
    statements::{
        AliasTypeStmt, AssignmentStmt, BlockStmt, ClassTypeStmt, ExpressionStmt, ExternFnStmt,
        FnDeclStmt, ForStmt, IfStmt, RestrictedBlockStmt, ReturnStmt, VarDeclStmt, WhileStmt,
    },
    types::{FunctionSignature, TypeWrapper},
};

/// `Ok(true)` to visit the children, `Ok(false)` to skip them.
pub type VisitResult = Result<bool, Error>;

pub trait Visitor {
    fn visit_node(&mut self, _node: Node<'_>) -> VisitResult {
        Ok(true)
    }

    // Categories

    fn visit_expr(&mut self, node: Node<'_>) -> VisitResult {
        self.visit_node(node)
    }

    fn visit_literal(&mut self, node: Node<'_>) -> VisitResult {
        self.visit_expr(node)
    }

    fn visit_stmt(&mut self, node: Node<'_>) -> VisitResult {
        self.visit_node(node)
    }

    fn visit_restricted(&mut self, node: Node<'_>) -> VisitResult {
        self.visit_stmt(node)
    }

    fn visit_type_definition(&mut self, node: Node<'_>) -> VisitResult {
        self.visit_restricted(node)
    }

    // Expressions

    fn visit_bool(&mut self, node: &mut BoolExpr) -> VisitResult {
        self.visit_literal(Node::Bool(node))
    }

    fn visit_string(&mut self, node: &mut StringExpr) -> VisitResult {
        self.visit_literal(Node::String(node))
    }

    fn visit_number(&mut self, node: &mut NumberExpr) -> VisitResult {
        self.visit_literal(Node::Number(node))
    }

    fn visit_variable(&mut self, node: &mut VariableExpr) -> VisitResult {
        self.visit_expr(Node::Variable(node))
    }

    fn visit_symbol(&mut self, node: &mut SymbolExpr) -> VisitResult {
        self.visit_expr(Node::Symbol(node))
    }

    fn visit_call(&mut self, node: &mut CallExpr) -> VisitResult {
        self.visit_expr(Node::Call(node))
    }

    fn visit_unary(&mut self, node: &mut UnaryExpr) -> VisitResult {
        self.visit_expr(Node::Unary(node))
    }

    fn visit_binary(&mut self, node: &mut BinaryExpr) -> VisitResult {
        self.visit_expr(Node::Binary(node))
    }

    // Statements

    fn visit_expression_stmt(&mut self, node: &mut ExpressionStmt) -> VisitResult {
        self.visit_stmt(Node::ExpressionStmt(node))
    }

    fn visit_return(&mut self, node: &mut ReturnStmt) -> VisitResult {
        self.visit_stmt(Node::Return(node))
    }

    fn visit_var_decl(&mut self, node: &mut VarDeclStmt) -> VisitResult {
        self.visit_stmt(Node::VarDecl(node))
    }

    fn visit_assignment(&mut self, node: &mut AssignmentStmt) -> VisitResult {
        self.visit_stmt(Node::Assignment(node))
    }

    fn visit_if(&mut self, node: &mut IfStmt) -> VisitResult {
        self.visit_stmt(Node::If(node))
    }

    fn visit_while(&mut self, node: &mut WhileStmt) -> VisitResult {
        self.visit_stmt(Node::While(node))
    }

    fn visit_for(&mut self, node: &mut ForStmt) -> VisitResult {
        self.visit_stmt(Node::For(node))
    }

    fn visit_block(&mut self, node: &mut BlockStmt) -> VisitResult {
        self.visit_stmt(Node::Block(node))
    }

    // Restricted statements

    fn visit_restricted_block(&mut self, node: &mut RestrictedBlockStmt) -> VisitResult {
        self.visit_restricted(Node::RestrictedBlock(node))
    }

    fn visit_fn_decl(&mut self, node: &mut FnDeclStmt) -> VisitResult {
        self.visit_restricted(Node::FnDecl(node))
    }

    fn visit_extern_fn(&mut self, node: &mut ExternFnStmt) -> VisitResult {
        self.visit_restricted(Node::ExternFn(node))
    }

    fn visit_alias_type(&mut self, node: &mut AliasTypeStmt) -> VisitResult {
        self.visit_type_definition(Node::AliasType(node))
    }

    fn visit_class_type(&mut self, node: &mut ClassTypeStmt) -> VisitResult {
        self.visit_type_definition(Node::ClassType(node))
    }

    // Shared nodes, only reachable through `Rc`

    fn visit_signature(&mut self, node: &FunctionSignature) -> VisitResult {
        self.visit_node(Node::Signature(node))
    }

    fn visit_type(&mut self, node: &TypeWrapper) -> VisitResult {
        self.visit_node(Node::Type(node))
    }
}

pub fn walk_restricted_block<V: Visitor + ?Sized>(
    visitor: &mut V,
    block: &mut RestrictedBlockStmt,
) -> Result<(), Error> {
    if visitor.visit_restricted_block(block)? {
        for stmt in block.iter_mut() {
            walk_restricted_stmt(visitor, stmt)?;
        }
    }

    Ok(())
}

pub fn walk_restricted_stmt<V: Visitor + ?Sized>(
    visitor: &mut V,
    stmt: &mut RestrictedStmt,
) -> Result<(), Error> {
    match stmt {
        RestrictedStmt::FnDecl(node) => {
            if visitor.visit_fn_decl(node)? {
                walk_signature(visitor, &node.signature)?;
                walk_block(visitor, &mut node.body)?;
            }
        }
        RestrictedStmt::ExternFn(node) => {
            if visitor.visit_extern_fn(node)? {
                walk_signature(visitor, &node.signature)?;
            }
        }
        RestrictedStmt::AliasType(node) => {
            if visitor.visit_alias_type(node)? {
                walk_type(visitor, &node.target)?;
            }
        }
        RestrictedStmt::ClassType(node) => {
            if visitor.visit_class_type(node)? {
                for field in &node.fields {
                    walk_type(visitor, &field.ty)?;
                }
                walk_restricted_block(visitor, &mut node.body)?;
            }
        }
    }

    Ok(())
}

pub fn walk_signature<V: Visitor + ?Sized>(
    visitor: &mut V,
    signature: &FunctionSignature,
) -> Result<(), Error> {
    if visitor.visit_signature(signature)? {
        for parameter in &signature.parameters {
            walk_type(visitor, &parameter.ty)?;
        }
        walk_type(visitor, &signature.return_type)?;
    }

    Ok(())
}

pub fn walk_type<V: Visitor + ?Sized>(visitor: &mut V, ty: &TypeWrapper) -> Result<(), Error> {
    visitor.visit_type(ty)?;
    Ok(())
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &mut BlockStmt) -> Result<(), Error> {
    if visitor.visit_block(block)? {
        for stmt in block.iter_mut() {
            walk_stmt(visitor, stmt)?;
        }
    }

    Ok(())
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &mut Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::Expression(node) => {
            if visitor.visit_expression_stmt(node)? {
                walk_expr(visitor, &mut node.expression)?;
            }
        }
        Stmt::Return(node) => {
            if visitor.visit_return(node)? {
                if let Some(value) = &mut node.value {
                    walk_expr(visitor, value)?;
                }
            }
        }
        Stmt::VarDecl(node) => {
            if visitor.visit_var_decl(node)? {
                walk_type(visitor, &node.variable.ty)?;
                walk_expr(visitor, &mut node.value)?;
            }
        }
        Stmt::Assignment(node) => {
            if visitor.visit_assignment(node)? {
                walk_expr(visitor, &mut node.value)?;
            }
        }
        Stmt::If(node) => {
            if visitor.visit_if(node)? {
                walk_expr(visitor, &mut node.condition)?;
                walk_block(visitor, &mut node.then_body)?;
                if let Some(else_body) = &mut node.else_body {
                    walk_block(visitor, else_body)?;
                }
            }
        }
        Stmt::While(node) => {
            if visitor.visit_while(node)? {
                walk_expr(visitor, &mut node.condition)?;
                walk_block(visitor, &mut node.body)?;
            }
        }
        Stmt::For(node) => {
            if visitor.visit_for(node)? {
                walk_type(visitor, &node.variable.ty)?;
                walk_expr(visitor, &mut node.start)?;
                walk_expr(visitor, &mut node.end)?;
                if let Some(step) = &mut node.step {
                    walk_expr(visitor, step)?;
                }
                walk_block(visitor, &mut node.body)?;
            }
        }
        Stmt::Block(node) => walk_block(visitor, node)?,
        Stmt::Restricted(node) => walk_restricted_stmt(visitor, node)?,
    }

    Ok(())
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &mut Expr) -> Result<(), Error> {
    match expr {
        Expr::Bool(node) => {
            visitor.visit_bool(node)?;
        }
        Expr::String(node) => {
            visitor.visit_string(node)?;
        }
        Expr::Number(node) => {
            visitor.visit_number(node)?;
        }
        Expr::Variable(node) => {
            visitor.visit_variable(node)?;
        }
        Expr::Symbol(node) => {
            visitor.visit_symbol(node)?;
        }
        Expr::Call(node) => {
            if visitor.visit_call(node)? {
                walk_expr(visitor, &mut node.callee)?;
                for argument in node.arguments.iter_mut() {
                    walk_expr(visitor, argument)?;
                }
            }
        }
        Expr::Unary(node) => {
            if visitor.visit_unary(node)? {
                walk_expr(visitor, &mut node.operand)?;
            }
        }
        Expr::Binary(node) => {
            if visitor.visit_binary(node)? {
                walk_expr(visitor, &mut node.left)?;
                walk_expr(visitor, &mut node.right)?;
            }
        }
    }

    Ok(())
}
