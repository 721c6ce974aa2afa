use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{
    ast::Expr,
    types::{BuiltInType, FunctionRef, VariableRef},
};

#[derive(Debug)]
pub struct BoolExpr {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

/// The concrete value of a number literal once its type is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl NumberValue {
    pub fn get_type(&self) -> BuiltInType {
        match self {
            NumberValue::I8(_) => BuiltInType::I8,
            NumberValue::I16(_) => BuiltInType::I16,
            NumberValue::I32(_) => BuiltInType::I32,
            NumberValue::I64(_) => BuiltInType::I64,
            NumberValue::U8(_) => BuiltInType::U8,
            NumberValue::U16(_) => BuiltInType::U16,
            NumberValue::U32(_) => BuiltInType::U32,
            NumberValue::U64(_) => BuiltInType::U64,
            NumberValue::F32(_) => BuiltInType::F32,
            NumberValue::F64(_) => BuiltInType::F64,
        }
    }
}

/// A number literal. `text` is kept exactly as written; `value` is filled
/// in by numeric literal resolution.
#[derive(Debug)]
pub struct NumberExpr {
    pub text: String,
    pub value: Option<NumberValue>,
    pub span: Span,
}

#[derive(Debug)]
pub struct VariableExpr {
    pub variable: VariableRef,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Unresolved(String),
    Function(FunctionRef),
}

/// A name that was not a visible variable when it was parsed.
#[derive(Debug)]
pub struct SymbolExpr {
    pub symbol: Symbol,
    pub span: Span,
}

impl SymbolExpr {
    pub fn get_name(&self) -> &str {
        match &self.symbol {
            Symbol::Unresolved(name) => name,
            Symbol::Function(signature) => &signature.name,
        }
    }

    pub fn get_function(&self) -> Option<&FunctionRef> {
        match &self.symbol {
            Symbol::Function(signature) => Some(signature),
            Symbol::Unresolved(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::Dash => Some(UnaryOperator::Negate),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Plus | TokenKind::PlusEquals => Some(BinaryOperator::Add),
            TokenKind::Dash | TokenKind::DashEquals => Some(BinaryOperator::Subtract),
            TokenKind::Star | TokenKind::StarEquals => Some(BinaryOperator::Multiply),
            TokenKind::Slash | TokenKind::SlashEquals => Some(BinaryOperator::Divide),
            TokenKind::Percent | TokenKind::PercentEquals => Some(BinaryOperator::Modulo),
            TokenKind::Equals => Some(BinaryOperator::Equals),
            TokenKind::NotEquals => Some(BinaryOperator::NotEquals),
            TokenKind::Less => Some(BinaryOperator::Less),
            TokenKind::LessEquals => Some(BinaryOperator::LessEquals),
            TokenKind::Greater => Some(BinaryOperator::Greater),
            TokenKind::GreaterEquals => Some(BinaryOperator::GreaterEquals),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Or => Some(BinaryOperator::Or),
            _ => None,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::Less
                | BinaryOperator::LessEquals
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEquals
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equals => "==",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}
