use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::Node,
        statements::{AliasTypeStmt, ClassTypeStmt, ExternFnStmt, FnDeclStmt, RestrictedBlockStmt},
        types::{BuiltInType, FunctionRef, TypeRef},
        visitor::{walk_restricted_block, VisitResult, Visitor},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// What a type name stands for once every definition has been seen.
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    BuiltIn(BuiltInType),
    /// `type Name = Target`; holds the target as written.
    Alias(TypeRef),
    Class(TypeRef),
}

/// Every type and function defined anywhere in a module, by name.
#[derive(Debug)]
pub struct ModuleSymbols {
    pub types: HashMap<String, TypeDefinition>,
    pub functions: HashMap<String, FunctionRef>,
}

impl ModuleSymbols {
    pub fn new() -> Self {
        let types = BuiltInType::ALL
            .iter()
            .map(|kind| (kind.get_name().to_string(), TypeDefinition::BuiltIn(*kind)))
            .collect();

        ModuleSymbols {
            types,
            functions: HashMap::new(),
        }
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionRef> {
        self.functions.get(name)
    }

    fn register_type(
        &mut self,
        name: &str,
        definition: TypeDefinition,
        position: Position,
    ) -> Result<(), Error> {
        if self.types.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateType {
                    type_: name.to_string(),
                },
                position,
            ));
        }

        tracing::trace!(type_name = name, "collected type");
        self.types.insert(name.to_string(), definition);
        Ok(())
    }

    fn register_function(&mut self, signature: &FunctionRef) -> Result<(), Error> {
        if self.functions.contains_key(&signature.name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: signature.name.clone(),
                },
                signature.span.start,
            ));
        }

        tracing::trace!(function = %signature.mangled_name, "collected function");
        self.functions
            .insert(signature.name.clone(), Rc::clone(signature));
        Ok(())
    }
}

impl Default for ModuleSymbols {
    fn default() -> Self {
        Self::new()
    }
}

/// Records type and function definitions. Nothing inside an expression can
/// define anything, so expressions are never entered.
struct Collector {
    symbols: ModuleSymbols,
}

impl Visitor for Collector {
    fn visit_expr(&mut self, _node: Node<'_>) -> VisitResult {
        Ok(false)
    }

    fn visit_fn_decl(&mut self, node: &mut FnDeclStmt) -> VisitResult {
        self.symbols.register_function(&node.signature)?;
        Ok(true)
    }

    fn visit_extern_fn(&mut self, node: &mut ExternFnStmt) -> VisitResult {
        self.symbols.register_function(&node.signature)?;
        Ok(false)
    }

    fn visit_alias_type(&mut self, node: &mut AliasTypeStmt) -> VisitResult {
        self.symbols.register_type(
            &node.name,
            TypeDefinition::Alias(Rc::clone(&node.target.ty)),
            node.span.start,
        )?;
        Ok(false)
    }

    fn visit_class_type(&mut self, node: &mut ClassTypeStmt) -> VisitResult {
        self.symbols.register_type(
            &node.name,
            TypeDefinition::Class(Rc::clone(&node.ty)),
            node.span.start,
        )?;
        Ok(true)
    }
}

/// Collects the module's definitions into one flat namespace.
#[tracing::instrument(skip_all)]
pub fn collect(block: &mut RestrictedBlockStmt) -> Result<ModuleSymbols, Error> {
    let mut collector = Collector {
        symbols: ModuleSymbols::new(),
    };
    walk_restricted_block(&mut collector, block)?;

    let symbols = collector.symbols;
    tracing::debug!(
        types = symbols.types.len(),
        functions = symbols.functions.len(),
        "collected definitions"
    );

    Ok(symbols)
}
