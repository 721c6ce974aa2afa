use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse_tokens,
};

use super::{
    ast::{Node, RestrictedStmt, Stmt},
    expressions::{CallExpr, NumberExpr},
    statements::{FnDeclStmt, RestrictedBlockStmt},
    types::{BuiltInType, ResolvedType, Type, TypeState, TypeWrapper},
    visitor::{walk_restricted_block, VisitResult, Visitor},
};

fn parse_source(source: &str) -> RestrictedBlockStmt {
    parse_tokens(tokenize(source).unwrap(), "test").unwrap()
}

/// Counts what reaches each category handler.
#[derive(Default)]
struct Counter {
    literals: usize,
    expressions: usize,
    statements: usize,
    types: usize,
}

impl Visitor for Counter {
    fn visit_literal(&mut self, _node: Node<'_>) -> VisitResult {
        self.literals += 1;
        Ok(true)
    }

    fn visit_expr(&mut self, _node: Node<'_>) -> VisitResult {
        self.expressions += 1;
        Ok(true)
    }

    fn visit_stmt(&mut self, _node: Node<'_>) -> VisitResult {
        self.statements += 1;
        Ok(true)
    }

    fn visit_type(&mut self, _node: &TypeWrapper) -> VisitResult {
        self.types += 1;
        Ok(true)
    }
}

#[test]
fn test_visitor_category_forwarding() {
    let mut block = parse_source("fn f(a: i32) -> i32 {\n return a + 1 * 2\n}");
    let mut counter = Counter::default();
    walk_restricted_block(&mut counter, &mut block).unwrap();

    // Both number literals stop at visit_literal
    assert_eq!(counter.literals, 2);
    // `a`, `1 * 2` and `a + (1 * 2)`
    assert_eq!(counter.expressions, 3);
    // The module block, the function, its body and the return
    assert_eq!(counter.statements, 4);
    // One parameter and the return type
    assert_eq!(counter.types, 2);
}

/// Skips every function body.
#[derive(Default)]
struct SignaturesOnly {
    functions: Vec<String>,
    numbers: usize,
}

impl Visitor for SignaturesOnly {
    fn visit_fn_decl(&mut self, node: &mut FnDeclStmt) -> VisitResult {
        self.functions.push(node.signature.name.clone());
        Ok(false)
    }

    fn visit_number(&mut self, _node: &mut NumberExpr) -> VisitResult {
        self.numbers += 1;
        Ok(true)
    }
}

#[test]
fn test_visitor_skips_children() {
    let mut block = parse_source("fn a() {\n x: i32 = 1\n}\ntype T {\n fn b() {\n  y: i32 = 2\n }\n}");
    let mut visitor = SignaturesOnly::default();
    walk_restricted_block(&mut visitor, &mut block).unwrap();

    assert_eq!(visitor.functions, vec!["a", "b"]);
    assert_eq!(visitor.numbers, 0);
}

/// Fails on the first call it sees.
struct RejectCalls;

impl Visitor for RejectCalls {
    fn visit_call(&mut self, node: &mut CallExpr) -> VisitResult {
        Err(Error::new(ErrorImpl::NotCallable, node.span.start))
    }
}

#[test]
fn test_visitor_error_stops_walk() {
    let mut block = parse_source("fn main() {\n x: i32 = 1\n f(x)\n}");
    let error = walk_restricted_block(&mut RejectCalls, &mut block).unwrap_err();

    assert_eq!(error.get_internal_error(), &ErrorImpl::NotCallable);
    assert_eq!(error.get_position().line, 3);
}

#[test]
fn test_expression_display() {
    let block = parse_source("fn main() {\n x := -f(1, \"a\") + !true\n}");
    let RestrictedStmt::FnDecl(main) = &block.body[0] else {
        panic!("expected a function");
    };
    let Stmt::VarDecl(decl) = &main.body.body[0] else {
        panic!("expected a declaration");
    };

    assert_eq!(decl.value.to_string(), "((-f(1, \"a\")) + (!true))");
}

#[test]
fn test_type_states() {
    let unresolved = Type::unresolved("Point").into_ref();
    assert!(unresolved.borrow().is_unresolved());
    assert_eq!(unresolved.borrow().to_string(), "Point");

    unresolved
        .borrow_mut()
        .resolve(ResolvedType::BuiltIn(BuiltInType::U8));
    assert_eq!(unresolved.borrow().get_built_in(), Some(BuiltInType::U8));
    assert_eq!(unresolved.borrow().to_string(), "u8");

    let auto = Type::auto();
    assert_eq!(auto.get_state(), &TypeState::Auto);
    assert!(Type::built_in(BuiltInType::Void).is_void());
}

#[test]
fn test_built_in_families() {
    assert!(BuiltInType::I8.same_family(&BuiltInType::I64));
    assert!(BuiltInType::F32.same_family(&BuiltInType::F64));
    assert!(!BuiltInType::I32.same_family(&BuiltInType::U32));
    assert!(!BuiltInType::Bool.same_family(&BuiltInType::Bool));
    assert_eq!(BuiltInType::from_name("u16"), Some(BuiltInType::U16));
    assert_eq!(BuiltInType::from_name("int"), None);
}
