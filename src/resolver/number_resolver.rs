//! Numeric literal resolution.
//!
//! A number literal has no type of its own; it takes the type the
//! surrounding code expects of it. This pass walks the tree with that
//! expectation in hand, parses each literal into a concrete [`NumberValue`]
//! and checks it fits. Variables declared with `:=` get their type here too,
//! from the value they are initialised with.
//!
//! Expectations flow from:
//! - the declared type of the variable being initialised or assigned
//! - the return type of the enclosing function, at `return`
//! - parameter types, for call arguments
//! - the other operand of a binary expression, when nothing outside it
//!   expects a type

use crate::{
    ast::{
        ast::{Expr, RestrictedStmt, Stmt},
        expressions::{NumberExpr, NumberValue, UnaryOperator},
        statements::{BlockStmt, RestrictedBlockStmt},
        types::{BuiltInType, ResolvedType, VariableRef},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

struct NumberResolver {
    /// Return types of the functions being resolved, innermost last
    return_types: Vec<Option<ResolvedType>>,
    resolved: usize,
}

impl NumberResolver {
    fn resolve_restricted_block(&mut self, block: &mut RestrictedBlockStmt) -> Result<(), Error> {
        for stmt in block.iter_mut() {
            self.resolve_restricted_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_restricted_stmt(&mut self, stmt: &mut RestrictedStmt) -> Result<(), Error> {
        match stmt {
            RestrictedStmt::FnDecl(decl) => {
                self.return_types
                    .push(decl.signature.return_type.get_resolved());
                let result = self.resolve_block(&mut decl.body);
                self.return_types.pop();
                result
            }
            RestrictedStmt::ClassType(class) => self.resolve_restricted_block(&mut class.body),
            RestrictedStmt::ExternFn(_) | RestrictedStmt::AliasType(_) => Ok(()),
        }
    }

    fn resolve_block(&mut self, block: &mut BlockStmt) -> Result<(), Error> {
        for stmt in block.iter_mut() {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::Expression(stmt) => {
                self.resolve_expr(&mut stmt.expression, None)?;
            }
            Stmt::Return(stmt) => {
                let expected = self.return_types.last().cloned().flatten();
                if let Some(value) = &mut stmt.value {
                    let received = self.resolve_expr(value, expected.as_ref())?;
                    check_family(expected.as_ref(), received.as_ref(), value.get_span().start)?;
                }
            }
            Stmt::VarDecl(stmt) => {
                if stmt.variable.ty.ty.borrow().is_auto() {
                    let inferred = self.resolve_expr(&mut stmt.value, None)?;
                    infer_variable(&stmt.variable, inferred, "variable")?;
                } else {
                    let expected = stmt.variable.ty.get_resolved();
                    let received = self.resolve_expr(&mut stmt.value, expected.as_ref())?;
                    check_family(
                        expected.as_ref(),
                        received.as_ref(),
                        stmt.value.get_span().start,
                    )?;
                }
            }
            Stmt::Assignment(stmt) => {
                let expected = stmt.variable.ty.get_resolved();
                let received = self.resolve_expr(&mut stmt.value, expected.as_ref())?;
                check_family(
                    expected.as_ref(),
                    received.as_ref(),
                    stmt.value.get_span().start,
                )?;
            }
            Stmt::If(stmt) => {
                self.resolve_condition(&mut stmt.condition)?;
                self.resolve_block(&mut stmt.then_body)?;
                if let Some(else_body) = &mut stmt.else_body {
                    self.resolve_block(else_body)?;
                }
            }
            Stmt::While(stmt) => {
                self.resolve_condition(&mut stmt.condition)?;
                self.resolve_block(&mut stmt.body)?;
            }
            Stmt::For(stmt) => {
                if stmt.variable.ty.ty.borrow().is_auto() {
                    let inferred = peek_type(&stmt.start)
                        .or_else(|| peek_type(&stmt.end))
                        .or_else(|| stmt.step.as_ref().and_then(peek_type));
                    infer_variable(&stmt.variable, inferred, "loop variable")?;
                }

                let expected = stmt.variable.ty.get_resolved();
                let bounds = std::iter::once(&mut stmt.start)
                    .chain(std::iter::once(&mut stmt.end))
                    .chain(stmt.step.as_mut());
                for bound in bounds {
                    let received = self.resolve_expr(bound, expected.as_ref())?;
                    check_family(expected.as_ref(), received.as_ref(), bound.get_span().start)?;
                }

                self.resolve_block(&mut stmt.body)?;
            }
            Stmt::Block(block) => self.resolve_block(block)?,
            Stmt::Restricted(stmt) => self.resolve_restricted_stmt(stmt)?,
        }

        Ok(())
    }

    fn resolve_condition(&mut self, condition: &mut Expr) -> Result<(), Error> {
        let bool_type = ResolvedType::BuiltIn(BuiltInType::Bool);
        self.resolve_expr(condition, Some(&bool_type))?;
        Ok(())
    }

    /// Resolves the literals in `expr`, given the type expected of it, and
    /// returns the type of `expr` when it can be told.
    fn resolve_expr(
        &mut self,
        expr: &mut Expr,
        expected: Option<&ResolvedType>,
    ) -> Result<Option<ResolvedType>, Error> {
        fold_negative_literal(expr);

        match expr {
            Expr::Bool(_) => Ok(Some(ResolvedType::BuiltIn(BuiltInType::Bool))),
            Expr::String(_) => Ok(Some(ResolvedType::BuiltIn(BuiltInType::String))),
            Expr::Number(number) => {
                let kind = self.resolve_number(number, expected)?;
                Ok(Some(ResolvedType::BuiltIn(kind)))
            }
            Expr::Variable(variable) => Ok(variable.variable.ty.get_resolved()),
            Expr::Symbol(_) => Ok(None),
            Expr::Call(call) => {
                let signature = match call.callee.as_ref() {
                    Expr::Symbol(symbol) => symbol.get_function().cloned(),
                    _ => None,
                };

                for (index, argument) in call.arguments.iter_mut().enumerate() {
                    let expected = signature
                        .as_ref()
                        .and_then(|signature| signature.parameters.get(index))
                        .and_then(|parameter| parameter.ty.get_resolved());
                    let received = self.resolve_expr(argument, expected.as_ref())?;
                    check_family(expected.as_ref(), received.as_ref(), argument.get_span().start)?;
                }

                Ok(signature.and_then(|signature| signature.return_type.get_resolved()))
            }
            Expr::Unary(unary) => match unary.operator {
                UnaryOperator::Negate => self.resolve_expr(&mut unary.operand, expected),
                UnaryOperator::Not => {
                    let bool_type = ResolvedType::BuiltIn(BuiltInType::Bool);
                    self.resolve_expr(&mut unary.operand, Some(&bool_type))?;
                    Ok(Some(bool_type))
                }
            },
            Expr::Binary(binary) => {
                let bool_type = ResolvedType::BuiltIn(BuiltInType::Bool);

                if binary.operator.is_logical() {
                    self.resolve_expr(&mut binary.left, Some(&bool_type))?;
                    self.resolve_expr(&mut binary.right, Some(&bool_type))?;
                    return Ok(Some(bool_type));
                }

                // Comparisons produce a bool whatever their operands are, so
                // only the operands can say what the literals should be
                let outer = if binary.operator.is_arithmetic() {
                    expected.cloned()
                } else {
                    None
                };
                let operand_type = outer
                    .or_else(|| peek_type(&binary.left))
                    .or_else(|| peek_type(&binary.right));

                let left = self.resolve_expr(&mut binary.left, operand_type.as_ref())?;
                let right = self.resolve_expr(&mut binary.right, operand_type.as_ref())?;
                check_family(left.as_ref(), right.as_ref(), binary.right.get_span().start)?;

                if binary.operator.is_comparison() {
                    Ok(Some(bool_type))
                } else {
                    Ok(dominant_type(left, right))
                }
            }
        }
    }

    fn resolve_number(
        &mut self,
        number: &mut NumberExpr,
        expected: Option<&ResolvedType>,
    ) -> Result<BuiltInType, Error> {
        let Some(expected) = expected else {
            return Err(Error::new(
                ErrorImpl::CannotInferType {
                    subject: format!("number '{}'", number.text),
                },
                number.span.start,
            ));
        };

        let kind = match expected.get_built_in() {
            Some(kind) if kind.is_numeric() => kind,
            _ => {
                return Err(Error::new(
                    ErrorImpl::NumberInNonNumericContext {
                        number: number.text.clone(),
                        type_: expected.to_string(),
                    },
                    number.span.start,
                ))
            }
        };

        number.value = Some(parse_number(&number.text, kind, number.span.start)?);
        self.resolved += 1;
        Ok(kind)
    }
}

/// Turns `-<literal>` into a single negative literal, so `-128` is checked
/// against `i8` as a whole.
fn fold_negative_literal(expr: &mut Expr) {
    let Expr::Unary(unary) = expr else {
        return;
    };
    if unary.operator != UnaryOperator::Negate {
        return;
    }
    let Expr::Number(number) = unary.operand.as_ref() else {
        return;
    };
    if number.text.starts_with('-') {
        return;
    }

    let folded = Expr::Number(NumberExpr {
        text: format!("-{}", number.text),
        value: None,
        span: unary.span,
    });
    *expr = folded;
}

/// The type of `expr` as far as it is known without resolving any literal.
fn peek_type(expr: &Expr) -> Option<ResolvedType> {
    match expr {
        Expr::Bool(_) => Some(ResolvedType::BuiltIn(BuiltInType::Bool)),
        Expr::String(_) => Some(ResolvedType::BuiltIn(BuiltInType::String)),
        Expr::Number(_) | Expr::Symbol(_) => None,
        Expr::Variable(variable) => variable.variable.ty.get_resolved(),
        Expr::Call(call) => match call.callee.as_ref() {
            Expr::Symbol(symbol) => symbol
                .get_function()
                .and_then(|signature| signature.return_type.get_resolved()),
            _ => None,
        },
        Expr::Unary(unary) => match unary.operator {
            UnaryOperator::Negate => peek_type(&unary.operand),
            UnaryOperator::Not => Some(ResolvedType::BuiltIn(BuiltInType::Bool)),
        },
        Expr::Binary(binary) => {
            if binary.operator.is_arithmetic() {
                dominant_type(peek_type(&binary.left), peek_type(&binary.right))
            } else {
                Some(ResolvedType::BuiltIn(BuiltInType::Bool))
            }
        }
    }
}

/// The wider of two numeric types of one family, or whichever is known.
fn dominant_type(left: Option<ResolvedType>, right: Option<ResolvedType>) -> Option<ResolvedType> {
    match (left, right) {
        (Some(left), Some(right)) => {
            match (left.get_built_in(), right.get_built_in()) {
                (Some(l), Some(r)) if l.same_family(&r) && r.get_bit_width() > l.get_bit_width() => {
                    Some(right)
                }
                _ => Some(left),
            }
        }
        (left, right) => left.or(right),
    }
}

/// Signed integers, unsigned integers and floats never convert into each
/// other implicitly.
fn check_family(
    expected: Option<&ResolvedType>,
    received: Option<&ResolvedType>,
    position: Position,
) -> Result<(), Error> {
    let (Some(expected), Some(received)) = (expected, received) else {
        return Ok(());
    };
    let (Some(expected_kind), Some(received_kind)) =
        (expected.get_built_in(), received.get_built_in())
    else {
        return Ok(());
    };

    if expected_kind.is_numeric()
        && received_kind.is_numeric()
        && !expected_kind.same_family(&received_kind)
    {
        return Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: expected.to_string(),
                received: received.to_string(),
            },
            position,
        ));
    }

    Ok(())
}

/// Gives a `:=` variable or untyped loop counter the type it was inferred to
/// have.
fn infer_variable(
    variable: &VariableRef,
    inferred: Option<ResolvedType>,
    subject: &str,
) -> Result<(), Error> {
    match inferred {
        Some(resolved) if resolved.get_built_in() != Some(BuiltInType::Void) => {
            tracing::trace!(variable = %variable.name, inferred = %resolved, "inferred type");
            variable.ty.ty.borrow_mut().resolve(resolved);
            Ok(())
        }
        _ => Err(Error::new(
            ErrorImpl::CannotInferType {
                subject: format!("{} '{}'", subject, variable.name),
            },
            variable.span.start,
        )),
    }
}

/// Parses literal text as written (optional leading `-`, `_` separators,
/// `0x` prefix, fractional part) into a value of type `kind`.
pub fn parse_number(text: &str, kind: BuiltInType, position: Position) -> Result<NumberValue, Error> {
    let overflow = || {
        Error::new(
            ErrorImpl::NumberOverflow {
                number: text.to_string(),
                type_: kind.to_string(),
            },
            position,
        )
    };

    let negative = text.starts_with('-');
    let digits: String = text
        .trim_start_matches('-')
        .chars()
        .filter(|c| *c != '_')
        .collect();
    let is_float = digits.contains('.');

    if kind.is_integer() {
        if is_float {
            return Err(Error::new(
                ErrorImpl::FloatInIntegerContext {
                    number: text.to_string(),
                    type_: kind.to_string(),
                },
                position,
            ));
        }

        let magnitude = parse_magnitude(&digits, text, kind, position)?;
        if negative && kind.is_unsigned_integer() && magnitude != 0 {
            return Err(Error::new(
                ErrorImpl::NegativeUnsigned {
                    number: text.to_string(),
                    type_: kind.to_string(),
                },
                position,
            ));
        }

        let magnitude = i128::try_from(magnitude).map_err(|_| overflow())?;
        let value = if negative { -magnitude } else { magnitude };

        let number = match kind {
            BuiltInType::I8 => i8::try_from(value).map(NumberValue::I8),
            BuiltInType::I16 => i16::try_from(value).map(NumberValue::I16),
            BuiltInType::I32 => i32::try_from(value).map(NumberValue::I32),
            BuiltInType::I64 => i64::try_from(value).map(NumberValue::I64),
            BuiltInType::U8 => u8::try_from(value).map(NumberValue::U8),
            BuiltInType::U16 => u16::try_from(value).map(NumberValue::U16),
            BuiltInType::U32 => u32::try_from(value).map(NumberValue::U32),
            _ => u64::try_from(value).map(NumberValue::U64),
        };
        return number.map_err(|_| overflow());
    }

    let magnitude = if is_float {
        digits.parse::<f64>().map_err(|_| overflow())?
    } else {
        parse_magnitude(&digits, text, kind, position)? as f64
    };
    let value = if negative { -magnitude } else { magnitude };

    match kind {
        BuiltInType::F32 => {
            if !value.is_finite() || value.abs() > f32::MAX as f64 {
                return Err(overflow());
            }
            Ok(NumberValue::F32(value as f32))
        }
        _ => {
            if !value.is_finite() {
                return Err(overflow());
            }
            Ok(NumberValue::F64(value))
        }
    }
}

/// The unsigned value of integer digits, decimal or `0x` hexadecimal.
fn parse_magnitude(
    digits: &str,
    text: &str,
    kind: BuiltInType,
    position: Position,
) -> Result<u128, Error> {
    let parsed = match digits.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => digits.parse::<u128>(),
    };

    parsed.map_err(|error| {
        let internal_error = match error.kind() {
            std::num::IntErrorKind::PosOverflow => ErrorImpl::NumberOverflow {
                number: text.to_string(),
                type_: kind.to_string(),
            },
            _ => ErrorImpl::MalformedNumber {
                number: text.to_string(),
            },
        };
        Error::new(internal_error, position)
    })
}

/// Resolves every number literal in the tree and infers the types of
/// variables declared without one.
#[tracing::instrument(skip_all)]
pub fn resolve_numbers(block: &mut RestrictedBlockStmt) -> Result<(), Error> {
    let mut resolver = NumberResolver {
        return_types: vec![],
        resolved: 0,
    };
    resolver.resolve_restricted_block(block)?;

    tracing::debug!(resolved = resolver.resolved, "resolved number literals");
    Ok(())
}
