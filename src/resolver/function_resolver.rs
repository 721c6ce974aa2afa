use std::rc::Rc;

use crate::{
    ast::{
        ast::Expr,
        expressions::{CallExpr, Symbol, SymbolExpr},
        statements::RestrictedBlockStmt,
        visitor::{walk_restricted_block, VisitResult, Visitor},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::collector::ModuleSymbols;

/// Binds every symbol to the function of that name and checks calls against
/// the signature they end up bound to.
struct FunctionResolver<'a> {
    symbols: &'a ModuleSymbols,
    resolved: usize,
}

impl FunctionResolver<'_> {
    fn bind(&mut self, node: &mut SymbolExpr) -> Result<(), Error> {
        let Symbol::Unresolved(name) = &node.symbol else {
            return Ok(());
        };

        let Some(signature) = self.symbols.get_function(name) else {
            return Err(Error::new(
                ErrorImpl::UnresolvedSymbol {
                    symbol: name.clone(),
                },
                node.span.start,
            ));
        };

        node.symbol = Symbol::Function(Rc::clone(signature));
        self.resolved += 1;
        Ok(())
    }
}

impl Visitor for FunctionResolver<'_> {
    fn visit_symbol(&mut self, node: &mut SymbolExpr) -> VisitResult {
        self.bind(node)?;
        Ok(false)
    }

    fn visit_call(&mut self, node: &mut CallExpr) -> VisitResult {
        let callee_position = node.callee.get_span().start;
        let Expr::Symbol(callee) = node.callee.as_mut() else {
            return Err(Error::new(ErrorImpl::NotCallable, callee_position));
        };
        self.bind(callee)?;

        let Some(signature) = callee.get_function() else {
            return Err(Error::new(ErrorImpl::NotCallable, callee_position));
        };

        let expected = signature.get_arity();
        let received = node.arguments.len();
        if received > expected {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    function: signature.name.clone(),
                    expected,
                    received,
                },
                node.arguments[expected].get_span().start,
            ));
        }
        if received < expected {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    function: signature.name.clone(),
                    expected,
                    received,
                },
                node.span.end,
            ));
        }

        Ok(true)
    }
}

/// Binds each symbol expression to its function signature.
#[tracing::instrument(skip_all)]
pub fn resolve_functions(
    symbols: &ModuleSymbols,
    block: &mut RestrictedBlockStmt,
) -> Result<(), Error> {
    let mut resolver = FunctionResolver {
        symbols,
        resolved: 0,
    };
    walk_restricted_block(&mut resolver, block)?;

    tracing::debug!(resolved = resolver.resolved, "resolved function references");
    Ok(())
}
