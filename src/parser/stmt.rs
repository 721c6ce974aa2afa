use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, RestrictedStmt, Stmt},
        expressions::BinaryOperator,
        statements::{
            AssignmentStmt, BlockStmt, ExpressionStmt, ForStmt, IfStmt, ReturnStmt, VarDeclStmt,
            WhileStmt,
        },
        types::{Type, TypeWrapper, Variable, VariableRef},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr, lookups::BindingPower, parser::Parser, restricted::parse_type_decl_stmt,
    types::parse_type,
};

/// Parses one statement of an executable block.
///
/// Keyword-led statements go through the statement lookup. A leading
/// identifier is a declaration when followed by `:=` or `:`, an assignment
/// when followed by `=` or a compound assignment, and an expression otherwise.
pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier {
        let next = parser.peek_token_kind();
        if matches!(next, TokenKind::ColonEquals | TokenKind::Colon) {
            return parse_var_decl_stmt(parser);
        }
        if next.is_assignment() {
            return parse_assignment_stmt(parser);
        }
    }

    parse_expression_stmt(parser)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parse_block_with(parser, vec![])
}

/// Parses `{ ... }` in a new scope that starts out holding `variables`.
/// Function parameters and loop counters are declared this way.
pub fn parse_block_with(
    parser: &mut Parser,
    variables: Vec<VariableRef>,
) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;
    parser.push_scope();

    for variable in variables {
        parser.declare_variable(variable)?;
    }

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    let scope = parser.pop_scope();

    Ok(BlockStmt {
        body,
        scope,
        span: parser.span_from(start),
    })
}

pub fn parse_nested_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block_stmt(parser)?))
}

/// `name := value` or `name: Type = value`. The value is parsed before the
/// name is declared, so it still sees any outer variable of the same name.
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    let ty = if parser.current_token_kind() == TokenKind::ColonEquals {
        parser.advance();
        TypeWrapper::new(Type::auto().into_ref(), name.span)
    } else {
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Assignment)?;
        ty
    };

    let value = parse_expr(parser, BindingPower::Default)?;

    let variable = Rc::new(Variable {
        name: name.value,
        ty,
        span: name.span,
    });
    parser.declare_variable(Rc::clone(&variable))?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        variable,
        value,
        span: parser.span_from(name.span.start),
    }))
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name = parser.expect(TokenKind::Identifier)?;

    let Some(variable) = parser.lookup_variable(&name.value) else {
        return Err(Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: name.value,
            },
            name.span.start,
        ));
    };

    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Assignment => None,
        kind => BinaryOperator::from_token_kind(kind),
    };

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Assignment(AssignmentStmt {
        variable,
        operator,
        value,
        span: parser.span_from(name.span.start),
    }))
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expression = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: *expression.get_span(),
        expression,
    }))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

/// `if (cond) { ... }`, followed by any number of `elseif (cond) { ... }`
/// and at most one `else { ... }`. Each `elseif` becomes an `if` that is the
/// only statement of the preceding else branch.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if_chain(parser)?))
}

fn parse_if_chain(parser: &mut Parser) -> Result<IfStmt, Error> {
    let start = parser.advance().span.start; // `if` or `elseif`
    let condition = parse_condition(parser)?;
    let then_body = parse_block_stmt(parser)?;

    let else_body = match parser.current_token_kind() {
        TokenKind::Elseif => {
            parser.push_scope();
            let nested = parse_if_chain(parser);
            let scope = parser.pop_scope();
            let nested = nested?;

            Some(BlockStmt {
                span: nested.span,
                body: vec![Stmt::If(nested)],
                scope,
            })
        }
        TokenKind::Else => {
            parser.advance();
            let else_body = parse_block_stmt(parser)?;

            if matches!(
                parser.current_token_kind(),
                TokenKind::Else | TokenKind::Elseif
            ) {
                return Err(Error::new(ErrorImpl::MultipleElse, parser.get_position()));
            }

            Some(else_body)
        }
        _ => None,
    };

    Ok(IfStmt {
        condition,
        then_body,
        else_body,
        span: parser.span_from(start),
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.expect(TokenKind::While)?.span.start;
    let condition = parse_condition(parser)?;
    let body = parse_block_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

/// `for (name[: Type] -> start, end[, step]) { ... }`. Without a type the
/// counter takes the type of `start`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_position = parser.expect(TokenKind::For)?.span.start;
    parser.expect(TokenKind::OpenParen)?;

    let name = parser.expect(TokenKind::Identifier)?;
    let ty = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        parse_type(parser, BindingPower::Default)?
    } else {
        TypeWrapper::new(Type::auto().into_ref(), name.span)
    };

    parser.expect(TokenKind::Arrow)?;
    let start = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Comma)?;
    let end = parse_expr(parser, BindingPower::Default)?;

    let step = if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let variable = Rc::new(Variable {
        name: name.value,
        ty,
        span: name.span,
    });
    let body = parse_block_with(parser, vec![Rc::clone(&variable)])?;

    Ok(Stmt::For(ForStmt {
        variable,
        start,
        end,
        step,
        body,
        span: parser.span_from(start_position),
    }))
}

/// `return` only takes a value that starts on its own line, so a bare
/// `return` may be followed by another statement on the next line.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.expect(TokenKind::Return)?;

    let value = if parser.has_tokens()
        && parser.current_token_kind() != TokenKind::CloseCurly
        && parser.current_token().span.start.line == keyword.span.start.line
    {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(keyword.span.start),
    }))
}

/// A type definition inside a function body, visible for the rest of the
/// enclosing block.
pub fn parse_local_type_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let stmt: RestrictedStmt = parse_type_decl_stmt(parser)?;
    Ok(Stmt::Restricted(stmt))
}
