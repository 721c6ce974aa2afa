use std::fmt::Display;

use crate::Span;

use super::{
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

#[derive(Debug)]
pub enum Expr {
    Bool(BoolExpr),
    String(StringExpr),
    Number(NumberExpr),
    Variable(VariableExpr),
    Symbol(SymbolExpr),
    Call(CallExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Bool(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Number(expr) => &expr.span,
            Expr::Variable(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
        }
    }
}

/// Renders the expression fully parenthesised, e.g. `(1 + (2 * 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Bool(expr) => write!(f, "{}", expr.value),
            Expr::String(expr) => write!(f, "{:?}", expr.value),
            Expr::Number(expr) => write!(f, "{}", expr.text),
            Expr::Variable(expr) => write!(f, "{}", expr.variable.name),
            Expr::Symbol(expr) => write!(f, "{}", expr.get_name()),
            Expr::Call(expr) => {
                write!(f, "{}(", expr.callee)?;
                for (index, argument) in expr.arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expr::Unary(expr) => write!(f, "({}{})", expr.operator, expr.operand),
            Expr::Binary(expr) => write!(f, "({} {} {})", expr.left, expr.operator, expr.right),
        }
    }
}

#[derive(Debug)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Return(ReturnStmt),
    VarDecl(VarDeclStmt),
    Assignment(AssignmentStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Block(BlockStmt),
    /// Type definitions are the only definitions allowed inside a body.
    Restricted(RestrictedStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Restricted(stmt) => stmt.get_span(),
        }
    }
}

#[derive(Debug)]
pub enum RestrictedStmt {
    FnDecl(FnDeclStmt),
    ExternFn(ExternFnStmt),
    AliasType(AliasTypeStmt),
    ClassType(ClassTypeStmt),
}

impl RestrictedStmt {
    pub fn get_span(&self) -> &Span {
        match self {
            RestrictedStmt::FnDecl(stmt) => &stmt.span,
            RestrictedStmt::ExternFn(stmt) => &stmt.span,
            RestrictedStmt::AliasType(stmt) => &stmt.span,
            RestrictedStmt::ClassType(stmt) => &stmt.span,
        }
    }
}

/// A read-only view of any node, handed to the catch-all visitor handlers.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Bool(&'a BoolExpr),
    String(&'a StringExpr),
    Number(&'a NumberExpr),
    Variable(&'a VariableExpr),
    Symbol(&'a SymbolExpr),
    Call(&'a CallExpr),
    Unary(&'a UnaryExpr),
    Binary(&'a BinaryExpr),
    ExpressionStmt(&'a ExpressionStmt),
    Return(&'a ReturnStmt),
    VarDecl(&'a VarDeclStmt),
    Assignment(&'a AssignmentStmt),
    If(&'a IfStmt),
    While(&'a WhileStmt),
    For(&'a ForStmt),
    Block(&'a BlockStmt),
    RestrictedBlock(&'a RestrictedBlockStmt),
    FnDecl(&'a FnDeclStmt),
    ExternFn(&'a ExternFnStmt),
    AliasType(&'a AliasTypeStmt),
    ClassType(&'a ClassTypeStmt),
    Signature(&'a FunctionSignature),
    Type(&'a TypeWrapper),
}

impl Node<'_> {
    pub fn get_span(&self) -> &Span {
        match self {
            Node::Bool(node) => &node.span,
            Node::String(node) => &node.span,
            Node::Number(node) => &node.span,
            Node::Variable(node) => &node.span,
            Node::Symbol(node) => &node.span,
            Node::Call(node) => &node.span,
            Node::Unary(node) => &node.span,
            Node::Binary(node) => &node.span,
            Node::ExpressionStmt(node) => &node.span,
            Node::Return(node) => &node.span,
            Node::VarDecl(node) => &node.span,
            Node::Assignment(node) => &node.span,
            Node::If(node) => &node.span,
            Node::While(node) => &node.span,
            Node::For(node) => &node.span,
            Node::Block(node) => &node.span,
            Node::RestrictedBlock(node) => &node.span,
            Node::FnDecl(node) => &node.span,
            Node::ExternFn(node) => &node.span,
            Node::AliasType(node) => &node.span,
            Node::ClassType(node) => &node.span,
            Node::Signature(node) => &node.span,
            Node::Type(node) => &node.span,
        }
    }
}
