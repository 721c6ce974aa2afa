use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt::Display,
    rc::Rc,
};

use lazy_static::lazy_static;

use crate::{lexer::tokens::Attribute, Span, MK_LOOKUP};

lazy_static! {
    pub static ref BUILT_IN_LOOKUP: HashMap<&'static str, BuiltInType> = MK_LOOKUP! {
        "void" => BuiltInType::Void,
        "bool" => BuiltInType::Bool,
        "string" => BuiltInType::String,
        "i8" => BuiltInType::I8,
        "i16" => BuiltInType::I16,
        "i32" => BuiltInType::I32,
        "i64" => BuiltInType::I64,
        "u8" => BuiltInType::U8,
        "u16" => BuiltInType::U16,
        "u32" => BuiltInType::U32,
        "u64" => BuiltInType::U64,
        "f32" => BuiltInType::F32,
        "f64" => BuiltInType::F64,
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BuiltInType {
    Void,
    Bool,
    String,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl BuiltInType {
    /// Every built-in type, in registration order.
    pub const ALL: [BuiltInType; 13] = [
        BuiltInType::Void,
        BuiltInType::Bool,
        BuiltInType::String,
        BuiltInType::I8,
        BuiltInType::I16,
        BuiltInType::I32,
        BuiltInType::I64,
        BuiltInType::U8,
        BuiltInType::U16,
        BuiltInType::U32,
        BuiltInType::U64,
        BuiltInType::F32,
        BuiltInType::F64,
    ];

    pub fn from_name(name: &str) -> Option<BuiltInType> {
        BUILT_IN_LOOKUP.get(name).copied()
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            BuiltInType::Void => "void",
            BuiltInType::Bool => "bool",
            BuiltInType::String => "string",
            BuiltInType::I8 => "i8",
            BuiltInType::I16 => "i16",
            BuiltInType::I32 => "i32",
            BuiltInType::I64 => "i64",
            BuiltInType::U8 => "u8",
            BuiltInType::U16 => "u16",
            BuiltInType::U32 => "u32",
            BuiltInType::U64 => "u64",
            BuiltInType::F32 => "f32",
            BuiltInType::F64 => "f64",
        }
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            BuiltInType::I8 | BuiltInType::I16 | BuiltInType::I32 | BuiltInType::I64
        )
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            BuiltInType::U8 | BuiltInType::U16 | BuiltInType::U32 | BuiltInType::U64
        )
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BuiltInType::F32 | BuiltInType::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn get_bit_width(&self) -> u32 {
        match self {
            BuiltInType::Void => 0,
            BuiltInType::Bool => 1,
            BuiltInType::I8 | BuiltInType::U8 => 8,
            BuiltInType::I16 | BuiltInType::U16 => 16,
            BuiltInType::I32 | BuiltInType::U32 | BuiltInType::F32 => 32,
            BuiltInType::I64 | BuiltInType::U64 | BuiltInType::F64 => 64,
            BuiltInType::String => 64,
        }
    }

    /// Signed integers, unsigned integers and floats never mix.
    pub fn same_family(&self, other: &BuiltInType) -> bool {
        (self.is_signed_integer() && other.is_signed_integer())
            || (self.is_unsigned_integer() && other.is_unsigned_integer())
            || (self.is_float() && other.is_float())
    }
}

impl Display for BuiltInType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

/// Stand-in for a user class until classes get a real layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    BuiltIn(BuiltInType),
    Class(ClassDescriptor),
}

impl ResolvedType {
    pub fn get_built_in(&self) -> Option<BuiltInType> {
        match self {
            ResolvedType::BuiltIn(kind) => Some(*kind),
            ResolvedType::Class(_) => None,
        }
    }
}

impl Display for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedType::BuiltIn(kind) => write!(f, "{}", kind),
            ResolvedType::Class(class) => write!(f, "{}", class.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeState {
    /// Known only by name until type resolution runs.
    Unresolved,
    /// Declared with `:=`, filled in from the initialiser.
    Auto,
    Resolved(ResolvedType),
}

/// A named type. One instance is shared by every use of the name, so
/// resolving it in place updates all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    name: String,
    state: TypeState,
}

pub type TypeRef = Rc<RefCell<Type>>;

impl Type {
    pub fn unresolved(name: &str) -> Self {
        Type {
            name: name.to_string(),
            state: TypeState::Unresolved,
        }
    }

    pub fn auto() -> Self {
        Type {
            name: String::from("auto"),
            state: TypeState::Auto,
        }
    }

    pub fn built_in(kind: BuiltInType) -> Self {
        Type {
            name: kind.get_name().to_string(),
            state: TypeState::Resolved(ResolvedType::BuiltIn(kind)),
        }
    }

    pub fn into_ref(self) -> TypeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_state(&self) -> &TypeState {
        &self.state
    }

    pub fn is_unresolved(&self) -> bool {
        self.state == TypeState::Unresolved
    }

    pub fn is_auto(&self) -> bool {
        self.state == TypeState::Auto
    }

    pub fn get_resolved(&self) -> Option<&ResolvedType> {
        match &self.state {
            TypeState::Resolved(resolved) => Some(resolved),
            _ => None,
        }
    }

    pub fn get_built_in(&self) -> Option<BuiltInType> {
        self.get_resolved().and_then(ResolvedType::get_built_in)
    }

    pub fn is_void(&self) -> bool {
        self.get_built_in() == Some(BuiltInType::Void)
    }

    pub fn resolve(&mut self, resolved: ResolvedType) {
        self.state = TypeState::Resolved(resolved);
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            TypeState::Resolved(resolved) => write!(f, "{}", resolved),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// A single use of a type in the source: the shared type plus what is
/// particular to this spot.
#[derive(Debug, Clone)]
pub struct TypeWrapper {
    pub ty: TypeRef,
    pub is_optional: bool,
    pub span: Span,
}

impl TypeWrapper {
    pub fn new(ty: TypeRef, span: Span) -> Self {
        TypeWrapper {
            ty,
            is_optional: false,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_name(&self) -> String {
        self.ty.borrow().get_name().to_string()
    }

    pub fn get_resolved(&self) -> Option<ResolvedType> {
        self.ty.borrow().get_resolved().cloned()
    }

    pub fn get_built_in(&self) -> Option<BuiltInType> {
        self.ty.borrow().get_built_in()
    }
}

impl Display for TypeWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ty.borrow())?;
        if self.is_optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A variable, parameter, loop counter or class field. Shared between the
/// declaration and every reference to it.
#[derive(Debug)]
pub struct Variable {
    pub name: String,
    pub ty: TypeWrapper,
    pub span: Span,
}

pub type VariableRef = Rc<Variable>;

#[derive(Debug)]
pub struct FunctionSignature {
    pub name: String,
    /// `<module>@<name>`, unique within the module.
    pub mangled_name: String,
    pub parameters: Vec<VariableRef>,
    pub return_type: TypeWrapper,
    pub attributes: HashSet<Attribute>,
    pub is_extern: bool,
    pub span: Span,
}

pub type FunctionRef = Rc<FunctionSignature>;

impl FunctionSignature {
    pub fn mangle(module: &str, name: &str) -> String {
        format!("{}@{}", module, name)
    }

    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    pub fn is_constructor(&self) -> bool {
        self.has_attribute(Attribute::Constructor)
    }

    pub fn get_arity(&self) -> usize {
        self.parameters.len()
    }
}
