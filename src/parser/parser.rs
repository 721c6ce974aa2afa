//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry points.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement and restricted statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! While parsing it also keeps the stack of open scopes, so names are
//! looked up the moment they are read.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        statements::{RestrictedBlockStmt, Scope},
        types::{BuiltInType, Type, TypeRef, VariableRef},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    resolver::resolver::run_passes,
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        RestrictedHandler, RestrictedLookup, StmtHandler, StmtLookup,
    },
    restricted::parse_module_block,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. It tracks the current
/// position in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always ending with `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The module being parsed, used to mangle function names
    module: String,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for definitions allowed in restricted blocks
    restricted_lookup: RestrictedLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
    /// Open scopes, innermost last
    scopes: Vec<Scope>,
    /// Types referenced before any definition was visible, one per name
    forward_types: HashMap<String, TypeRef>,
    /// Counter for generating scope IDs
    current_id: i32,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `module` - Name of the module the tokens belong to
    ///
    /// # Returns
    ///
    /// A new Parser instance ready to parse the token stream.
    pub fn new(mut tokens: Vec<Token>, module: &str) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens.last().map(|token| token.span.end).unwrap_or_default();
            tokens.push(MK_TOKEN!(TokenKind::EOF, "EOF", end, end));
        }

        Parser {
            tokens,
            pos: 0,
            module: module.to_string(),
            stmt_lookup: HashMap::new(),
            restricted_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            scopes: vec![],
            forward_types: HashMap::new(),
            current_id: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token after the current one without advancing.
    pub fn peek_token(&self) -> &Token {
        let index = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek_token().kind
    }

    /// Advances to the next token and returns the previous token. The
    /// cursor never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        expected: expected_kind.describe(),
                        received: token.describe(),
                    },
                    token.span.start,
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns a default Error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedToken` error at the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                received: self.current_token().describe(),
            },
            self.get_position(),
        )
    }

    /// Checks if there are more tokens to parse.
    ///
    /// # Returns
    ///
    /// Returns true if the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the restricted statement lookup table.
    pub fn get_restricted_lookup(&self) -> &RestrictedLookup {
        &self.restricted_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `nud_fn` - The handler function for this prefix operator
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `stmt_fn` - The handler function for this statement type
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a handler for a definition allowed in restricted blocks.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `restricted_fn` - The handler function for this definition
    pub fn restricted(&mut self, kind: TokenKind, restricted_fn: RestrictedHandler) {
        self.restricted_lookup.insert(kind, restricted_fn);
    }

    /// Registers a type left denotation handler.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this type operator
    /// * `led_fn` - The handler function for this type operator
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `nud_fn` - The handler function for this type
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    ///
    /// # Returns
    ///
    /// The current ID value before incrementing.
    pub fn advance_id(&mut self) -> i32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Returns the start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }

    /// Returns the span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        let previous = self.pos.saturating_sub(1);
        Span::new(start, self.tokens[previous].span.end)
    }

    /// Returns the name of the module being parsed.
    pub fn get_module(&self) -> &str {
        &self.module
    }

    /// Opens a new scope nested in the current one.
    ///
    /// # Returns
    ///
    /// The ID of the new scope.
    pub fn push_scope(&mut self) -> i32 {
        let id = self.advance_id();
        let parent = self.scopes.last().map(|scope| scope.id);
        self.scopes.push(Scope::new(id, parent));
        id
    }

    /// Closes the current scope and hands its tables to the block that
    /// owns it.
    pub fn pop_scope(&mut self) -> Scope {
        self.scopes.pop().unwrap_or_default()
    }

    /// Registers every built-in type in the current scope.
    pub fn register_built_in_types(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            for kind in BuiltInType::ALL {
                scope
                    .types
                    .insert(kind.get_name().to_string(), Type::built_in(kind).into_ref());
            }
        }
    }

    /// Declares a variable in the current scope.
    ///
    /// # Arguments
    ///
    /// * `variable` - The variable to declare
    ///
    /// # Returns
    ///
    /// An error if the current scope already declares a variable with the
    /// same name. Outer scopes may; the new variable shadows theirs.
    pub fn declare_variable(&mut self, variable: VariableRef) -> Result<(), Error> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };

        if scope.variables.contains_key(&variable.name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: variable.name.clone(),
                },
                variable.span.start,
            ));
        }

        scope.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Finds the innermost visible variable with the given name.
    pub fn lookup_variable(&self, name: &str) -> Option<VariableRef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get_variable(name))
            .map(Rc::clone)
    }

    /// Declares a type in the current scope.
    ///
    /// # Arguments
    ///
    /// * `name` - The name the type is known by
    /// * `ty` - The shared type instance
    /// * `position` - Where the definition starts, for errors
    pub fn declare_type(&mut self, name: &str, ty: TypeRef, position: Position) -> Result<(), Error> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };

        if scope.types.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::TypeAlreadyDeclared {
                    type_: name.to_string(),
                },
                position,
            ));
        }

        tracing::trace!(type_name = name, scope = scope.id, "declared type");
        scope.types.insert(name.to_string(), ty);
        Ok(())
    }

    /// Finds the innermost visible type with the given name.
    pub fn lookup_type(&self, name: &str) -> Option<TypeRef> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get_type(name))
            .map(Rc::clone)
    }

    /// Returns the type a name refers to at this point of the parse. A name
    /// with no visible definition gets an unresolved placeholder, shared by
    /// every such reference to the same name.
    pub fn resolve_type_name(&mut self, name: &str) -> TypeRef {
        if let Some(ty) = self.lookup_type(name) {
            return ty;
        }

        Rc::clone(
            self.forward_types
                .entry(name.to_string())
                .or_insert_with(|| Type::unresolved(name).into_ref()),
        )
    }

    /// Removes and returns the placeholder created for forward references to
    /// `name`, if any.
    pub fn take_forward_type(&mut self, name: &str) -> Option<TypeRef> {
        self.forward_types.remove(name)
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree without running
/// the resolution passes.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `module` - Name of the module, used for mangled function names
///
/// # Returns
///
/// The top-level restricted block, or the first error met.
pub fn parse_tokens(tokens: Vec<Token>, module: &str) -> Result<RestrictedBlockStmt, Error> {
    let mut parser = Parser::new(tokens, module);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    parse_module_block(&mut parser)
}

/// Lexes, parses and resolves one module.
///
/// This is the main entry point. Callers either receive a tree in which
/// every type and function reference is resolved, or the first error,
/// tagged with `file`.
///
/// # Arguments
///
/// * `module` - Name of the module, used for mangled function names
/// * `file` - Name of the source file, used only in diagnostics
/// * `source` - The source text
#[tracing::instrument(skip_all, fields(module = module, file = file))]
pub fn parse(module: &str, file: &str, source: &str) -> Result<RestrictedBlockStmt, Error> {
    let file = Rc::new(file.to_string());

    let result = tokenize(source)
        .and_then(|tokens| parse_tokens(tokens, module))
        .and_then(|mut block| {
            run_passes(module, &mut block)?;
            Ok(block)
        });

    result.map_err(|error| {
        tracing::debug!(%error, "front end failed");
        error.with_file(&file)
    })
}
