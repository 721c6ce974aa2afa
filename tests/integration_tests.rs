//! Integration tests for the whole front end.
//!
//! These go through the public API only: source text in, resolved tree or
//! diagnostic out.

use seam_frontend::{
    ast::{
        ast::{Expr, RestrictedStmt, Stmt},
        expressions::{NumberValue, Symbol},
        statements::{BlockStmt, RestrictedBlockStmt},
        types::BuiltInType,
    },
    errors::errors::{ErrorImpl, ErrorKind},
    format_error,
    lexer::{lexer::tokenize, tokens::TokenKind},
    Module, Position,
};

fn compile(source: &str) -> RestrictedBlockStmt {
    Module::new("main", "main.seam", source).parse().unwrap()
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

#[test]
fn test_token_sequence() {
    let tokens = tokenize("fn f(a: i32) -> i32 { return a + 1 }").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Fn,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::OpenCurly,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Number,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );

    let values: Vec<&str> = tokens
        .iter()
        .filter(|token| matches!(token.kind, TokenKind::Identifier | TokenKind::Number))
        .map(|token| token.value.as_str())
        .collect();
    assert_eq!(values, vec!["f", "a", "i32", "i32", "a", "1"]);
}

#[test]
fn test_compile_program() {
    let source = "\
extern print(value: i64)

type Count = i64

fn sum(limit: Count) -> Count {
    total: Count = 0
    for (i -> 0, limit) {
        if (i % 2 == 0) {
            total += i
        } elseif (i > 100) {
            total -= 1
        } else {
            print(i)
        }
    }
    return total
}

fn main() @export {
    print(sum(10))
}
";
    let block = compile(source);

    let sum = block.get_function("sum").unwrap();
    assert_eq!(sum.mangled_name, "main@sum");
    assert_eq!(sum.return_type.get_built_in(), Some(BuiltInType::I64));
    assert!(block.get_function("print").unwrap().is_extern);

    let body = function_body(&block, "sum");
    let Stmt::VarDecl(total) = &body.body[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(total.variable.ty.get_built_in(), Some(BuiltInType::I64));
    let Expr::Number(zero) = &total.value else {
        panic!("expected a number");
    };
    assert_eq!(zero.value, Some(NumberValue::I64(0)));

    let Stmt::For(for_stmt) = &body.body[1] else {
        panic!("expected a for loop");
    };
    assert_eq!(for_stmt.variable.ty.get_built_in(), Some(BuiltInType::I64));

    let main = function_body(&block, "main");
    let Stmt::Expression(stmt) = &main.body[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Call(call) = &stmt.expression else {
        panic!("expected a call");
    };
    let Expr::Symbol(callee) = call.callee.as_ref() else {
        panic!("expected a symbol");
    };
    assert!(matches!(&callee.symbol, Symbol::Function(signature) if signature.is_extern));
}

#[test]
fn test_precedence() {
    let block = compile("fn f(a: i32, b: i32) {\n x := a + 1 == b\n y := 1 + 2 * a\n}");
    let body = function_body(&block, "f");

    let rendered: Vec<String> = body
        .iter()
        .map(|stmt| match stmt {
            Stmt::VarDecl(decl) => decl.value.to_string(),
            other => panic!("expected a declaration, got {:?}", other),
        })
        .collect();
    assert_eq!(rendered, vec!["((a + 1) == b)", "(1 + (2 * a))"]);
}

#[test]
fn test_scope_shadowing() {
    let source = "\
fn f() {
    x: i8 = 1
    {
        x: u64 = 2
        a := x
    }
    b := x
}
";
    let block = compile(source);
    let body = function_body(&block, "f");

    let Stmt::Block(inner) = &body.body[1] else {
        panic!("expected a nested block");
    };
    let Stmt::VarDecl(a) = &inner.body[1] else {
        panic!("expected a declaration");
    };
    assert_eq!(a.variable.ty.get_built_in(), Some(BuiltInType::U64));

    let Stmt::VarDecl(b) = &body.body[2] else {
        panic!("expected a declaration");
    };
    assert_eq!(b.variable.ty.get_built_in(), Some(BuiltInType::I8));
}

#[test]
fn test_redeclaration_in_one_block() {
    let error = Module::new("main", "main.seam", "fn f() {\n x: i8 = 1\n x: i8 = 2\n}")
        .parse()
        .unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::Parse);
    assert_eq!(error.get_position(), &Position::new(3, 2));
}

#[test]
fn test_unknown_type() {
    let source = "fn main() {\n    x: Bogus = 1\n}";
    let error = Module::new("main", "main.seam", source).parse().unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::Parse);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnknownType {
            type_: String::from("Bogus")
        }
    );
    assert_eq!(
        error.to_string(),
        "main.seam:2:8: parse error: cannot use undefined type 'Bogus'"
    );

    let rendered = format_error(&error, source);
    assert!(rendered.starts_with("Error: UnknownType"));
    assert!(rendered.contains("-> main.seam"));
    assert!(rendered.contains("2 | x: Bogus = 1"));
}

#[test]
fn test_numeric_range() {
    let block = compile("fn main() {\n x: i8 = 100\n}");
    let body = function_body(&block, "main");
    let Stmt::VarDecl(decl) = &body.body[0] else {
        panic!("expected a declaration");
    };
    let Expr::Number(number) = &decl.value else {
        panic!("expected a number");
    };
    assert_eq!(number.value, Some(NumberValue::I8(100)));

    let error = Module::new("main", "main.seam", "fn main() {\n x: i8 = 200\n}")
        .parse()
        .unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Semantic);
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::NumberOverflow { .. }
    ));
}

#[test]
fn test_duplicate_type_in_one_scope() {
    let error = Module::new("main", "main.seam", "type A = i32\ntype A = i32")
        .parse()
        .unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeAlreadyDeclared {
            type_: String::from("A")
        }
    );
    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_first_error_aborts() {
    // Both lines are wrong; only the first is reported
    let error = Module::new("main", "main.seam", "fn main() {\n a: Nope = 1\n b: i8 = 999\n}")
        .parse()
        .unwrap_err();

    assert_eq!(error.get_position().line, 2);
}

#[test]
fn test_extern_call() {
    let block = compile("extern puts(s: string)\nfn main() { puts(\"hi\") }");

    let puts = block.get_function("puts").unwrap();
    assert!(puts.is_extern);
    assert_eq!(puts.mangled_name, "main@puts");
}

#[test]
fn test_lexical_error() {
    let error = Module::new("main", "main.seam", "fn main() {\n s := \"open\n}")
        .parse()
        .unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::Lexical);
    assert_eq!(error.get_internal_error(), &ErrorImpl::UnterminatedString);
    assert_eq!(error.get_file(), Some("main.seam"));
}
