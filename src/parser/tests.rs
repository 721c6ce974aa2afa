//! Unit tests for the parser module.
//!
//! These run the parser alone, without the resolution passes, and cover:
//! - Operator precedence and associativity
//! - Scopes, shadowing and redeclaration
//! - Control flow statements
//! - Function signatures and type definitions

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, RestrictedStmt, Stmt},
        expressions::Symbol,
        statements::{BlockStmt, RestrictedBlockStmt},
        types::TypeState,
    },
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::{lexer::tokenize, tokens::Attribute},
    Position,
};

use super::parser::{parse, parse_tokens};

fn parse_source(source: &str) -> Result<RestrictedBlockStmt, Error> {
    parse_tokens(tokenize(source)?, "test")
}

fn function_body<'a>(block: &'a RestrictedBlockStmt, name: &str) -> &'a BlockStmt {
    block
        .iter()
        .find_map(|stmt| match stmt {
            RestrictedStmt::FnDecl(decl) if decl.signature.name == name => Some(&decl.body),
            _ => None,
        })
        .unwrap()
}

fn expression_of(source: &str) -> String {
    let block = parse_source(&format!("fn main() {{ x := {} }}", source)).unwrap();
    match &function_body(&block, "main").body[0] {
        Stmt::VarDecl(decl) => decl.value.to_string(),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    assert_eq!(expression_of("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(expression_of("2 * 3 + 1"), "((2 * 3) + 1)");
    assert_eq!(expression_of("a + 1 == b"), "((a + 1) == b)");
    assert_eq!(expression_of("a || b && c"), "(a || (b && c))");
    assert_eq!(expression_of("a < b && c != d"), "((a < b) && (c != d))");
}

#[test]
fn test_parse_left_associative() {
    assert_eq!(expression_of("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(expression_of("8 / 4 % 3"), "((8 / 4) % 3)");
}

#[test]
fn test_parse_unary_binds_tightest() {
    assert_eq!(expression_of("-a * b"), "((-a) * b)");
    assert_eq!(expression_of("!a && b"), "((!a) && b)");
    assert_eq!(expression_of("-(a + b)"), "(-(a + b))");
}

#[test]
fn test_parse_grouping() {
    assert_eq!(expression_of("(1 + 2) * 3"), "((1 + 2) * 3)");
}

#[test]
fn test_parse_calls() {
    assert_eq!(expression_of("f(1, g(2), 3 + 4)"), "f(1, g(2), (3 + 4))");
    assert_eq!(expression_of("f()"), "f()");
    assert_eq!(expression_of("f(1)(2)"), "f(1)(2)");
}

#[test]
fn test_parse_call_on_next_line_is_new_statement() {
    let block = parse_source("fn main() {\n  f\n  (1 + 2)\n}").unwrap();
    let body = function_body(&block, "main");

    assert_eq!(body.body.len(), 2);
    assert!(matches!(&body.body[0], Stmt::Expression(stmt) if stmt.expression.to_string() == "f"));
}

#[test]
fn test_parse_call_trailing_comma() {
    let error = parse_source("fn main() { f(1, ) }").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::ExpectedExpression { .. }
    ));
}

#[test]
fn test_parse_identifier_binding() {
    let block = parse_source("fn main() { a := 1\n b := a + c }").unwrap();
    let body = function_body(&block, "main");

    let Stmt::VarDecl(decl) = &body.body[1] else {
        panic!("expected a declaration");
    };
    let Expr::Binary(binary) = &decl.value else {
        panic!("expected a binary expression");
    };

    let Stmt::VarDecl(first) = &body.body[0] else {
        panic!("expected a declaration");
    };
    match binary.left.as_ref() {
        Expr::Variable(variable) => assert!(Rc::ptr_eq(&variable.variable, &first.variable)),
        other => panic!("expected a variable, got {:?}", other),
    }
    match binary.right.as_ref() {
        Expr::Symbol(symbol) => {
            assert!(matches!(&symbol.symbol, Symbol::Unresolved(name) if name == "c"))
        }
        other => panic!("expected a symbol, got {:?}", other),
    }
}

#[test]
fn test_parse_scope_shadowing() {
    let source = "fn main() {\n x := 1\n {\n  x := 2\n  y := x\n }\n z := x\n}";
    let block = parse_source(source).unwrap();
    let body = function_body(&block, "main");

    let Stmt::VarDecl(outer) = &body.body[0] else {
        panic!("expected a declaration");
    };
    let Stmt::Block(inner_block) = &body.body[1] else {
        panic!("expected a block");
    };
    let Stmt::VarDecl(inner) = &inner_block.body[0] else {
        panic!("expected a declaration");
    };
    let Stmt::VarDecl(inner_use) = &inner_block.body[1] else {
        panic!("expected a declaration");
    };
    let Stmt::VarDecl(outer_use) = &body.body[2] else {
        panic!("expected a declaration");
    };

    let Expr::Variable(inner_ref) = &inner_use.value else {
        panic!("expected a variable");
    };
    let Expr::Variable(outer_ref) = &outer_use.value else {
        panic!("expected a variable");
    };

    assert!(Rc::ptr_eq(&inner_ref.variable, &inner.variable));
    assert!(Rc::ptr_eq(&outer_ref.variable, &outer.variable));
    assert!(!Rc::ptr_eq(&inner.variable, &outer.variable));
}

#[test]
fn test_parse_redeclaration_in_same_scope() {
    let error = parse_source("fn main() {\n x := 1\n x := 2\n}").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::Parse);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableAlreadyDeclared {
            variable: String::from("x")
        }
    );
    assert_eq!(error.get_position(), &Position::new(3, 2));
}

#[test]
fn test_parse_initialiser_sees_outer_variable() {
    let source = "fn main() {\n x := 1\n {\n  x := x + 1\n }\n}";
    let block = parse_source(source).unwrap();
    let body = function_body(&block, "main");

    let Stmt::VarDecl(outer) = &body.body[0] else {
        panic!("expected a declaration");
    };
    let Stmt::Block(inner_block) = &body.body[1] else {
        panic!("expected a block");
    };
    let Stmt::VarDecl(inner) = &inner_block.body[0] else {
        panic!("expected a declaration");
    };
    let Expr::Binary(binary) = &inner.value else {
        panic!("expected a binary expression");
    };
    let Expr::Variable(reference) = binary.left.as_ref() else {
        panic!("expected a variable");
    };

    assert!(Rc::ptr_eq(&reference.variable, &outer.variable));
}

#[test]
fn test_parse_assignment() {
    let block = parse_source("fn main() { x := 1\n x += 2\n x = 3 }").unwrap();
    let body = function_body(&block, "main");

    let Stmt::Assignment(compound) = &body.body[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(compound.operator.map(|op| op.to_string()), Some(String::from("+")));

    let Stmt::Assignment(plain) = &body.body[2] else {
        panic!("expected an assignment");
    };
    assert!(plain.operator.is_none());
}

#[test]
fn test_parse_assignment_to_undeclared() {
    let error = parse_source("fn main() { y = 3 }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: String::from("y")
        }
    );
}

#[test]
fn test_parse_parameters_in_body_scope() {
    let error = parse_source("fn f(a: i32) { a := 2 }").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { .. }
    ));

    let block = parse_source("fn f(a: i32) -> i32 { return a }").unwrap();
    let body = function_body(&block, "f");
    let Stmt::Return(ret) = &body.body[0] else {
        panic!("expected a return");
    };
    assert!(matches!(ret.value, Some(Expr::Variable(_))));
}

#[test]
fn test_parse_duplicate_parameters() {
    let error = parse_source("fn f(a: i32, a: i32) {}").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::VariableAlreadyDeclared { .. }
    ));
}

#[test]
fn test_parse_if_elseif_else() {
    let source = "fn main() {\n if (a) { f() } elseif (b) { g() } else { h() }\n}";
    let block = parse_source(source).unwrap();
    let body = function_body(&block, "main");

    let Stmt::If(if_stmt) = &body.body[0] else {
        panic!("expected an if");
    };
    let else_body = if_stmt.else_body.as_ref().unwrap();
    assert_eq!(else_body.body.len(), 1);

    let Stmt::If(nested) = &else_body.body[0] else {
        panic!("expected a nested if");
    };
    assert_eq!(nested.condition.to_string(), "b");
    assert!(nested.else_body.is_some());
}

#[test]
fn test_parse_multiple_else() {
    let error = parse_source("fn main() { if (a) {} else {} else {} }").unwrap_err();
    assert_eq!(error.get_internal_error(), &ErrorImpl::MultipleElse);
}

#[test]
fn test_parse_while() {
    let block = parse_source("fn main() { i := 0\n while (i < 10) { i += 1 } }").unwrap();
    let body = function_body(&block, "main");

    let Stmt::While(while_stmt) = &body.body[1] else {
        panic!("expected a while");
    };
    assert_eq!(while_stmt.condition.to_string(), "(i < 10)");
    assert_eq!(while_stmt.body.body.len(), 1);
}

#[test]
fn test_parse_for_loop() {
    let block = parse_source("fn main() { for (i: u8 -> 0, 10, 2) { x := i } }").unwrap();
    let body = function_body(&block, "main");

    let Stmt::For(for_stmt) = &body.body[0] else {
        panic!("expected a for loop");
    };
    assert_eq!(for_stmt.variable.name, "i");
    assert_eq!(for_stmt.variable.ty.get_name(), "u8");
    assert_eq!(for_stmt.end.to_string(), "10");
    assert_eq!(for_stmt.step.as_ref().map(|step| step.to_string()), Some(String::from("2")));

    let Stmt::VarDecl(decl) = &for_stmt.body.body[0] else {
        panic!("expected a declaration");
    };
    let Expr::Variable(reference) = &decl.value else {
        panic!("expected a variable");
    };
    assert!(Rc::ptr_eq(&reference.variable, &for_stmt.variable));
}

#[test]
fn test_parse_return_same_line_rule() {
    let block = parse_source("fn main() {\n return\n f()\n}").unwrap();
    let body = function_body(&block, "main");

    assert_eq!(body.body.len(), 2);
    assert!(matches!(&body.body[0], Stmt::Return(ret) if ret.value.is_none()));

    let block = parse_source("fn main() { return }").unwrap();
    let body = function_body(&block, "main");
    assert!(matches!(&body.body[0], Stmt::Return(ret) if ret.value.is_none()));
}

#[test]
fn test_parse_function_signature() {
    let block =
        parse_source("fn add(a: i32, b: i32) -> i32 @export { return a + b }").unwrap();
    let signature = block.get_function("add").unwrap();

    assert_eq!(signature.mangled_name, "test@add");
    assert_eq!(signature.get_arity(), 2);
    assert_eq!(signature.return_type.get_name(), "i32");
    assert!(signature.has_attribute(Attribute::Export));
    assert!(!signature.is_extern);
}

#[test]
fn test_parse_default_return_type() {
    let block = parse_source("fn main() {}").unwrap();
    let signature = block.get_function("main").unwrap();

    assert!(signature.return_type.ty.borrow().is_void());
}

#[test]
fn test_parse_extern_function() {
    let block = parse_source("extern puts(s: string) -> i32\nextern fn exit(code: i32)").unwrap();

    let puts = block.get_function("puts").unwrap();
    assert!(puts.is_extern);
    assert_eq!(puts.mangled_name, "test@puts");
    assert_eq!(puts.get_arity(), 1);
    assert_eq!(puts.span.start, Position::new(1, 8));

    let exit = block.get_function("exit").unwrap();
    assert!(exit.is_extern);
    assert!(exit.return_type.ty.borrow().is_void());

    let error = parse_source("extern (s: string)").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { .. }
    ));
}

#[test]
fn test_parse_constructor_rules() {
    assert!(parse_source("fn init() @constructor {}").is_ok());

    let error = parse_source("fn init(a: i32) @constructor {}").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConstructorParameters {
            function: String::from("init")
        }
    );

    let error = parse_source("fn init() -> i32 @constructor {}").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConstructorReturnType {
            function: String::from("init")
        }
    );

    // Not known yet; left for type resolution
    assert!(parse_source("fn init() -> V @constructor {}\ntype V = void").is_ok());
}

#[test]
fn test_parse_restricted_namespace() {
    let error = parse_source("x := 1").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::RestrictedStatement {
            received: String::from("x")
        }
    );
    assert_eq!(error.get_position(), &Position::new(1, 1));
}

#[test]
fn test_parse_type_alias_shares_target() {
    let block = parse_source("type Int = i32\nfn f(a: Int) {}").unwrap();

    let int_type = block.scope.get_type("Int").unwrap();
    let i32_type = block.scope.get_type("i32").unwrap();
    assert!(Rc::ptr_eq(int_type, i32_type));

    let signature = block.get_function("f").unwrap();
    assert!(Rc::ptr_eq(&signature.parameters[0].ty.ty, i32_type));
}

#[test]
fn test_parse_duplicate_type_in_scope() {
    let error = parse_source("type A = i32\ntype A = i32").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeAlreadyDeclared {
            type_: String::from("A")
        }
    );
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_parse_redefine_built_in() {
    let error = parse_source("type i32 = u8").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::TypeAlreadyDeclared { .. }
    ));
}

#[test]
fn test_parse_forward_type_reference() {
    let block = parse_source("fn f(p: Point) {}\ntype Point {\n fn g() {}\n}").unwrap();

    let signature = block.get_function("f").unwrap();
    let RestrictedStmt::ClassType(class) = &block.body[1] else {
        panic!("expected a class");
    };

    assert!(Rc::ptr_eq(&signature.parameters[0].ty.ty, &class.ty));
    assert_eq!(class.ty.borrow().get_state(), &TypeState::Unresolved);
    assert!(class.body.get_function("g").is_some());
}

#[test]
fn test_parse_class_fields() {
    let block = parse_source("type Point {\n x: i32\n y: i32?\n}").unwrap();
    let RestrictedStmt::ClassType(class) = &block.body[0] else {
        panic!("expected a class");
    };

    assert_eq!(class.fields.len(), 2);
    assert!(!class.fields[0].ty.is_optional);
    assert!(class.fields[1].ty.is_optional);
    assert_eq!(class.fields[1].ty.to_string(), "i32?");
}

#[test]
fn test_parse_type_missing_body() {
    let error = parse_source("type A i32").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("`=` or `{`"),
            received: String::from("i32"),
        }
    );
}

#[test]
fn test_parse_local_type() {
    let block = parse_source("fn main() {\n type Small = u8\n x: Small = 1\n}").unwrap();
    let body = function_body(&block, "main");

    assert!(matches!(
        &body.body[0],
        Stmt::Restricted(RestrictedStmt::AliasType(_))
    ));
    assert!(body.scope.get_type("Small").is_some());
    assert!(block.scope.get_type("Small").is_none());
}

#[test]
fn test_parse_unclosed_block() {
    let error = parse_source("fn main() {").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("`}`"),
            received: String::from("end of file"),
        }
    );
}

#[test]
fn test_parse_scope_ids() {
    let block = parse_source("fn main() { { } }").unwrap();
    let body = function_body(&block, "main");
    let Stmt::Block(inner) = &body.body[0] else {
        panic!("expected a block");
    };

    assert_eq!(block.scope.parent, None);
    assert_eq!(body.scope.parent, Some(block.scope.id));
    assert_eq!(inner.scope.parent, Some(body.scope.id));
}

#[test]
fn test_parse_tags_errors_with_file() {
    let error = parse("test", "main.seam", "fn main() { x := }").unwrap_err();

    assert_eq!(error.get_file(), Some("main.seam"));
    assert!(error.to_string().starts_with("main.seam:1:18: parse error:"));
}
