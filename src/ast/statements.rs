use std::{
    collections::HashMap,
    slice::{Iter, IterMut},
};

use crate::Span;

use super::{
    ast::{Expr, RestrictedStmt, Stmt},
    expressions::BinaryOperator,
    types::{FunctionRef, TypeRef, TypeWrapper, VariableRef},
};

/// The symbol tables of one lexical scope.
///
/// Scopes are numbered in the order the parser opens them; `parent` names
/// the enclosing scope, which always has a smaller id.
#[derive(Debug, Default)]
pub struct Scope {
    pub id: i32,
    pub parent: Option<i32>,
    pub variables: HashMap<String, VariableRef>,
    pub types: HashMap<String, TypeRef>,
}

impl Scope {
    pub fn new(id: i32, parent: Option<i32>) -> Self {
        Scope {
            id,
            parent,
            variables: HashMap::new(),
            types: HashMap::new(),
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&VariableRef> {
        self.variables.get(name)
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeRef> {
        self.types.get(name)
    }
}

#[derive(Debug)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub scope: Scope,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Stmt> {
        self.body.iter_mut()
    }
}

/// A block that only holds definitions: the top level of a module and the
/// body of a class type.
#[derive(Debug)]
pub struct RestrictedBlockStmt {
    pub body: Vec<RestrictedStmt>,
    pub scope: Scope,
    pub span: Span,
}

impl RestrictedBlockStmt {
    pub fn iter(&self) -> Iter<'_, RestrictedStmt> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, RestrictedStmt> {
        self.body.iter_mut()
    }

    /// Finds a function defined or declared directly in this block.
    pub fn get_function(&self, name: &str) -> Option<&FunctionRef> {
        self.body.iter().find_map(|stmt| match stmt {
            RestrictedStmt::FnDecl(decl) if decl.signature.name == name => Some(&decl.signature),
            RestrictedStmt::ExternFn(decl) if decl.signature.name == name => {
                Some(&decl.signature)
            }
            _ => None,
        })
    }
}

#[derive(Debug)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `name := value` or `name: Type = value`.
#[derive(Debug)]
pub struct VarDeclStmt {
    pub variable: VariableRef,
    pub value: Expr,
    pub span: Span,
}

/// `name = value`, or a compound form such as `name += value` when
/// `operator` is set.
#[derive(Debug)]
pub struct AssignmentStmt {
    pub variable: VariableRef,
    pub operator: Option<BinaryOperator>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// `for (name -> start, end[, step]) { ... }`
#[derive(Debug)]
pub struct ForStmt {
    pub variable: VariableRef,
    pub start: Expr,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug)]
pub struct FnDeclStmt {
    pub signature: FunctionRef,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug)]
pub struct ExternFnStmt {
    pub signature: FunctionRef,
    pub span: Span,
}

/// `type Name = Other`
#[derive(Debug)]
pub struct AliasTypeStmt {
    pub name: String,
    pub target: TypeWrapper,
    pub span: Span,
}

/// `type Name { ... }`
#[derive(Debug)]
pub struct ClassTypeStmt {
    pub name: String,
    pub ty: TypeRef,
    pub fields: Vec<VariableRef>,
    pub body: RestrictedBlockStmt,
    pub span: Span,
}
