use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, BinaryOperator, BoolExpr, CallExpr, NumberExpr, StringExpr, Symbol,
            SymbolExpr, UnaryExpr, UnaryOperator, VariableExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::ExpectedExpression {
                received: parser.current_token().describe(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While the operator ahead binds tighter than the caller allows, keep
    // folding it into the left hand side
    while let Some(operator_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if operator_bp <= bp {
            break;
        }

        let Some(led_fn) = parser
            .get_led_lookup()
            .get(&parser.current_token_kind())
            .copied()
        else {
            break;
        };

        left = led_fn(parser, left, operator_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Number => Ok(Expr::Number(NumberExpr {
            text: token.value,
            value: None,
            span: token.span,
        })),
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Bool(BoolExpr {
            value: token.kind == TokenKind::True,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::ExpectedExpression {
                received: token.describe(),
            },
            token.span.start,
        )),
    }
}

/// An identifier is bound to the innermost visible variable of that name.
/// Anything else is left for function resolution.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    let expr = match parser.lookup_variable(&token.value) {
        Some(variable) => Expr::Variable(VariableExpr {
            variable,
            span: token.span,
        }),
        None => Expr::Symbol(SymbolExpr {
            symbol: Symbol::Unresolved(token.value),
            span: token.span,
        }),
    };

    parse_call_suffix(parser, expr, token.span.start.line)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    parse_call_suffix(parser, expr, open.span.start.line)
}

/// Applies call argument lists to `callee`. A `(` only continues the
/// expression when it sits on `line`, the line the callee started on;
/// otherwise it begins a new statement.
pub fn parse_call_suffix(parser: &mut Parser, callee: Expr, line: u32) -> Result<Expr, Error> {
    let mut expr = callee;

    while parser.current_token_kind() == TokenKind::OpenParen
        && parser.current_token().span.start.line == line
    {
        let start = expr.get_span().start;
        let arguments = parse_call_arguments(parser)?;

        expr = Expr::Call(CallExpr {
            callee: Box::new(expr),
            arguments,
            span: parser.span_from(start),
        });
    }

    Ok(expr)
}

fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(arguments)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = UnaryOperator::from_token_kind(operator_token.kind)
        .ok_or_else(|| expected_expression_at(&operator_token))?;

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        span: Span::new(operator_token.span.start, operand.get_span().end),
        operator,
        operand: Box::new(operand),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = BinaryOperator::from_token_kind(operator_token.kind)
        .ok_or_else(|| expected_expression_at(&operator_token))?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

fn expected_expression_at(token: &Token) -> Error {
    Error::new(
        ErrorImpl::ExpectedExpression {
            received: token.describe(),
        },
        token.span.start,
    )
}
