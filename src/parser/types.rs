//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types (identifiers), bound to the type visible under that name
//! - Optional types (`Name?`)
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers for parsing type expressions.

use std::collections::HashMap;

use crate::{
    ast::types::TypeWrapper,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeWrapper, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeWrapper, BindingPower) -> Result<TypeWrapper, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
///
/// Registers NUD and LED handlers for parsing type expressions.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_led(TokenKind::Question, BindingPower::Primary, parse_optional_type);
}

/// Parses a type name. The name is bound right away to the type visible in
/// the open scopes, or to a placeholder that a later definition or type
/// resolution fills in.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeWrapper, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let ty = parser.resolve_type_name(&token.value);

    Ok(TypeWrapper::new(ty, token.span))
}

pub fn parse_optional_type(
    parser: &mut Parser,
    left: TypeWrapper,
    _bp: BindingPower,
) -> Result<TypeWrapper, Error> {
    let question = parser.expect(TokenKind::Question)?;

    Ok(TypeWrapper {
        span: left.span.to(&question.span),
        is_optional: true,
        ty: left.ty,
    })
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("type"),
                received: parser.current_token().describe(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(type_bp) = parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if type_bp <= bp {
            break;
        }

        let Some(led_fn) = parser
            .get_type_led_lookup()
            .get(&parser.current_token_kind())
            .copied()
        else {
            break;
        };

        left = led_fn(parser, left, type_bp)?;
    }

    Ok(left)
}
