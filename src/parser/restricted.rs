//! Definitions: the only statements allowed at the top level of a module
//! and inside type bodies.

use std::{collections::HashSet, rc::Rc};

use crate::{
    ast::{
        ast::RestrictedStmt,
        statements::{
            AliasTypeStmt, ClassTypeStmt, ExternFnStmt, FnDeclStmt, RestrictedBlockStmt,
        },
        types::{FunctionRef, FunctionSignature, Type, TypeWrapper, Variable},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{TokenKind, ATTRIBUTE_LOOKUP},
    Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_with, types::parse_type};

/// Parses a whole module into its top-level block. The block's scope holds
/// the built-in types plus every top-level type definition.
pub fn parse_module_block(parser: &mut Parser) -> Result<RestrictedBlockStmt, Error> {
    let start = parser.get_position();
    parser.push_scope();
    parser.register_built_in_types();

    let mut body = vec![];
    while parser.has_tokens() {
        body.push(parse_restricted_stmt(parser)?);
    }

    let scope = parser.pop_scope();
    tracing::debug!(
        module = parser.get_module(),
        definitions = body.len(),
        "parsed module"
    );

    Ok(RestrictedBlockStmt {
        body,
        scope,
        span: Span::new(start, parser.get_position()),
    })
}

pub fn parse_restricted_stmt(parser: &mut Parser) -> Result<RestrictedStmt, Error> {
    match parser
        .get_restricted_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        Some(restricted_fn) => restricted_fn(parser),
        None => Err(Error::new(
            ErrorImpl::RestrictedStatement {
                received: parser.current_token().describe(),
            },
            parser.get_position(),
        )),
    }
}

/// Parses `fn name(a: T, b: U) [-> R] [@attribute...]`, starting at `fn`.
/// After `extern` the `fn` is optional.
///
/// A missing return type means `void`. `@constructor` functions take no
/// parameters and return `void`.
pub fn parse_function_signature(
    parser: &mut Parser,
    is_extern: bool,
) -> Result<FunctionRef, Error> {
    let start = parser.get_position();
    if !is_extern || parser.current_token_kind() == TokenKind::Fn {
        parser.expect(TokenKind::Fn)?;
    }
    let name = parser.expect(TokenKind::Identifier)?;

    let parameter_list_position = parser.expect(TokenKind::OpenParen)?.span.start;
    let mut parameters: Vec<Rc<Variable>> = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let parameter = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser, BindingPower::Default)?;

            if parameters.iter().any(|existing| existing.name == parameter.value) {
                return Err(Error::new(
                    ErrorImpl::VariableAlreadyDeclared {
                        variable: parameter.value,
                    },
                    parameter.span.start,
                ));
            }

            parameters.push(Rc::new(Variable {
                name: parameter.value,
                ty,
                span: parameter.span,
            }));

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parse_type(parser, BindingPower::Default)?
    } else {
        TypeWrapper::new(parser.resolve_type_name("void"), name.span)
    };

    let mut attributes = HashSet::new();
    while parser.current_token_kind() == TokenKind::Attribute {
        let token = parser.advance().clone();
        let Some(attribute) = ATTRIBUTE_LOOKUP.get(token.value.as_str()) else {
            return Err(Error::new(
                ErrorImpl::UnknownAttribute {
                    attribute: token.value,
                },
                token.span.start,
            ));
        };
        attributes.insert(*attribute);
    }

    let signature = FunctionSignature {
        mangled_name: FunctionSignature::mangle(parser.get_module(), &name.value),
        name: name.value,
        parameters,
        return_type,
        attributes,
        is_extern,
        span: parser.span_from(start),
    };

    if signature.is_constructor() {
        if !signature.parameters.is_empty() {
            return Err(Error::new(
                ErrorImpl::ConstructorParameters {
                    function: signature.name,
                },
                parameter_list_position,
            ));
        }
        // A return type still known only by name is checked once types
        // are resolved
        let returns_value = {
            let return_type = signature.return_type.ty.borrow();
            !return_type.is_unresolved() && !return_type.is_void()
        };
        if returns_value {
            return Err(Error::new(
                ErrorImpl::ConstructorReturnType {
                    function: signature.name.clone(),
                },
                signature.return_type.span.start,
            ));
        }
    }

    tracing::debug!(
        function = %signature.name,
        mangled_name = %signature.mangled_name,
        arity = signature.get_arity(),
        "parsed function signature"
    );

    Ok(Rc::new(signature))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<RestrictedStmt, Error> {
    let start = parser.get_position();
    let signature = parse_function_signature(parser, false)?;
    let body = parse_block_with(parser, signature.parameters.clone())?;

    Ok(RestrictedStmt::FnDecl(FnDeclStmt {
        signature,
        body,
        span: parser.span_from(start),
    }))
}

/// `extern name(...)` or `extern fn name(...)`, a function defined outside
/// the module.
pub fn parse_extern_fn_stmt(parser: &mut Parser) -> Result<RestrictedStmt, Error> {
    let start = parser.expect(TokenKind::Extern)?.span.start;
    let signature = parse_function_signature(parser, true)?;

    Ok(RestrictedStmt::ExternFn(ExternFnStmt {
        signature,
        span: parser.span_from(start),
    }))
}

/// `type Name = Other` or `type Name { field: T ... definitions ... }`.
pub fn parse_type_decl_stmt(parser: &mut Parser) -> Result<RestrictedStmt, Error> {
    let start = parser.expect(TokenKind::Type)?.span.start;
    let name = parser.expect(TokenKind::Identifier)?;

    match parser.current_token_kind() {
        TokenKind::Assignment => {
            let position = parser.get_position();
            parser.advance();

            let target = parse_type(parser, BindingPower::Default)?;
            parser.declare_type(&name.value, Rc::clone(&target.ty), position)?;

            Ok(RestrictedStmt::AliasType(AliasTypeStmt {
                name: name.value,
                target,
                span: parser.span_from(start),
            }))
        }
        TokenKind::OpenCurly => {
            // Earlier uses of the name share the placeholder they created
            let ty = parser
                .take_forward_type(&name.value)
                .unwrap_or_else(|| Type::unresolved(&name.value).into_ref());
            parser.declare_type(&name.value, Rc::clone(&ty), name.span.start)?;

            let body_start = parser.advance().span.start;
            parser.push_scope();

            let mut fields = vec![];
            let mut body = vec![];
            while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
                if parser.current_token_kind() == TokenKind::Identifier {
                    let field = parser.expect(TokenKind::Identifier)?;
                    parser.expect(TokenKind::Colon)?;
                    let field_type = parse_type(parser, BindingPower::Default)?;

                    let variable = Rc::new(Variable {
                        name: field.value,
                        ty: field_type,
                        span: field.span,
                    });
                    parser.declare_variable(Rc::clone(&variable))?;
                    fields.push(variable);
                } else {
                    body.push(parse_restricted_stmt(parser)?);
                }
            }

            parser.expect(TokenKind::CloseCurly)?;
            let scope = parser.pop_scope();

            Ok(RestrictedStmt::ClassType(ClassTypeStmt {
                name: name.value,
                ty,
                fields,
                body: RestrictedBlockStmt {
                    body,
                    scope,
                    span: parser.span_from(body_start),
                },
                span: parser.span_from(start),
            }))
        }
        _ => Err(parser.unexpected("`=` or `{`")),
    }
}
