use std::collections::HashSet;

use crate::{
    ast::{
        ast::Node,
        statements::{ClassTypeStmt, RestrictedBlockStmt},
        types::{ClassDescriptor, FunctionSignature, ResolvedType, TypeRef, TypeWrapper},
        visitor::{walk_restricted_block, VisitResult, Visitor},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::collector::{ModuleSymbols, TypeDefinition};

/// Resolves every type named in the tree in place. Because each name is a
/// single shared instance, resolving one use resolves all of them.
struct TypeResolver<'a> {
    symbols: &'a ModuleSymbols,
    resolved: usize,
}

impl TypeResolver<'_> {
    /// Follows aliases from `name` until a built-in or class type is found.
    fn lookup(&self, name: &str, position: Position) -> Result<ResolvedType, Error> {
        let mut seen = HashSet::new();
        let mut current = name.to_string();

        loop {
            if !seen.insert(current.clone()) {
                return Err(Error::new(
                    ErrorImpl::CyclicTypeAlias {
                        type_: name.to_string(),
                    },
                    position,
                ));
            }

            match self.symbols.get_type(&current) {
                None => {
                    return Err(Error::new(
                        ErrorImpl::UnknownType { type_: current },
                        position,
                    ))
                }
                Some(TypeDefinition::BuiltIn(kind)) => return Ok(ResolvedType::BuiltIn(*kind)),
                Some(TypeDefinition::Class(_)) => {
                    return Ok(ResolvedType::Class(ClassDescriptor { name: current }))
                }
                Some(TypeDefinition::Alias(target)) => {
                    let target = target.borrow();
                    if let Some(resolved) = target.get_resolved() {
                        return Ok(resolved.clone());
                    }
                    current = target.get_name().to_string();
                }
            }
        }
    }

    fn resolve(&mut self, ty: &TypeRef, position: Position) -> Result<(), Error> {
        if !ty.borrow().is_unresolved() {
            return Ok(());
        }

        let name = ty.borrow().get_name().to_string();
        let resolved = self.lookup(&name, position)?;
        tracing::trace!(type_name = %name, resolved = %resolved, "resolved type");

        ty.borrow_mut().resolve(resolved);
        self.resolved += 1;
        Ok(())
    }
}

impl Visitor for TypeResolver<'_> {
    fn visit_expr(&mut self, _node: Node<'_>) -> VisitResult {
        Ok(false)
    }

    fn visit_class_type(&mut self, node: &mut ClassTypeStmt) -> VisitResult {
        if !node.fields.is_empty() {
            return Err(Error::new(
                ErrorImpl::ClassFieldsUnsupported {
                    class: node.name.clone(),
                },
                node.span.start,
            ));
        }

        self.resolve(&node.ty, node.span.start)?;
        Ok(true)
    }

    /// Resolves the signature's types here rather than in `visit_type`, so a
    /// constructor's return type can be checked once it is known.
    fn visit_signature(&mut self, node: &FunctionSignature) -> VisitResult {
        for parameter in &node.parameters {
            self.resolve(&parameter.ty.ty, parameter.ty.span.start)?;
        }
        self.resolve(&node.return_type.ty, node.return_type.span.start)?;

        if node.is_constructor() && !node.return_type.ty.borrow().is_void() {
            return Err(Error::new(
                ErrorImpl::ConstructorReturnType {
                    function: node.name.clone(),
                },
                node.return_type.span.start,
            ));
        }

        Ok(false)
    }

    fn visit_type(&mut self, node: &TypeWrapper) -> VisitResult {
        self.resolve(&node.ty, node.span.start)?;
        Ok(false)
    }
}

/// Replaces every unresolved type in the tree with what its name stands
/// for in `symbols`.
#[tracing::instrument(skip_all)]
pub fn resolve_types(symbols: &ModuleSymbols, block: &mut RestrictedBlockStmt) -> Result<(), Error> {
    let mut resolver = TypeResolver {
        symbols,
        resolved: 0,
    };
    walk_restricted_block(&mut resolver, block)?;

    tracing::debug!(resolved = resolver.resolved, "resolved types");
    Ok(())
}
