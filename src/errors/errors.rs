use std::{fmt::Display, rc::Rc};

use thiserror::Error;

use crate::Position;

/// Which stage of the front end rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Parse,
    Semantic,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Semantic => write!(f, "semantic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    file: Option<Rc<String>>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            file: None,
        }
    }

    /// Attaches the file name used when rendering the error. An error that
    /// already names a file keeps it.
    pub fn with_file(mut self, file: &Rc<String>) -> Self {
        if self.file.is_none() {
            self.file = Some(Rc::clone(file));
        }
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_file(&self) -> Option<&str> {
        self.file.as_ref().map(|file| file.as_str())
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnexpectedSymbol { .. }
            | ErrorImpl::MalformedNumber { .. }
            | ErrorImpl::UnterminatedComment
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnknownAttribute { .. } => ErrorKind::Lexical,

            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::ExpectedExpression { .. }
            | ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::TypeAlreadyDeclared { .. }
            | ErrorImpl::ConstructorParameters { .. }
            | ErrorImpl::ConstructorReturnType { .. }
            | ErrorImpl::MultipleElse
            | ErrorImpl::RestrictedStatement { .. }
            | ErrorImpl::UnknownType { .. }
            | ErrorImpl::UnresolvedSymbol { .. } => ErrorKind::Parse,

            ErrorImpl::DuplicateType { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::NotCallable
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::ClassFieldsUnsupported { .. }
            | ErrorImpl::CyclicTypeAlias { .. }
            | ErrorImpl::CannotInferType { .. }
            | ErrorImpl::NumberOverflow { .. }
            | ErrorImpl::FloatInIntegerContext { .. }
            | ErrorImpl::NegativeUnsigned { .. }
            | ErrorImpl::NumberInNonNumericContext { .. }
            | ErrorImpl::TypeMatchError { .. } => ErrorKind::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedSymbol { .. } => "UnexpectedSymbol",
            ErrorImpl::MalformedNumber { .. } => "MalformedNumber",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnknownAttribute { .. } => "UnknownAttribute",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::TypeAlreadyDeclared { .. } => "TypeAlreadyDeclared",
            ErrorImpl::ConstructorParameters { .. } => "ConstructorParameters",
            ErrorImpl::ConstructorReturnType { .. } => "ConstructorReturnType",
            ErrorImpl::MultipleElse => "MultipleElse",
            ErrorImpl::RestrictedStatement { .. } => "RestrictedStatement",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::DuplicateType { .. } => "DuplicateType",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            ErrorImpl::NotCallable => "NotCallable",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ClassFieldsUnsupported { .. } => "ClassFieldsUnsupported",
            ErrorImpl::CyclicTypeAlias { .. } => "CyclicTypeAlias",
            ErrorImpl::CannotInferType { .. } => "CannotInferType",
            ErrorImpl::NumberOverflow { .. } => "NumberOverflow",
            ErrorImpl::FloatInIntegerContext { .. } => "FloatInIntegerContext",
            ErrorImpl::NegativeUnsigned { .. } => "NegativeUnsigned",
            ErrorImpl::NumberInNonNumericContext { .. } => "NumberInNonNumericContext",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedComment => ErrorTip::Suggestion(String::from(
                "long comments are closed with another `///`",
            )),
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("did you forget a closing `\"`?"))
            }
            ErrorImpl::UnknownAttribute { .. } => ErrorTip::Suggestion(String::from(
                "the known attributes are `@constructor` and `@export`",
            )),
            ErrorImpl::MalformedNumber { number } if number.starts_with("0x") => {
                ErrorTip::Suggestion(String::from(
                    "hexadecimal literals cannot have a fractional part",
                ))
            }
            ErrorImpl::VariableAlreadyDeclared { variable } => ErrorTip::Suggestion(format!(
                "use `{} = ...` to assign to the existing variable",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "declare it first with `{} := ...`",
                variable
            )),
            ErrorImpl::RestrictedStatement { .. } => ErrorTip::Suggestion(String::from(
                "only `fn`, `extern` and `type` definitions are allowed here",
            )),
            ErrorImpl::UnexpectedArguments { expected, received, .. }
            | ErrorImpl::MissingArguments { expected, received, .. } => ErrorTip::Suggestion(
                format!("expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::CannotInferType { .. } => {
                ErrorTip::Suggestion(String::from("add an explicit type annotation"))
            }
            ErrorImpl::NumberOverflow { type_, .. } => ErrorTip::Suggestion(format!(
                "is the value within the range of `{}`?",
                type_
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }

        write!(
            f,
            "{}: {} error: {}",
            self.position,
            self.get_kind(),
            self.internal_error
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unexpected symbol {symbol:?}")]
    UnexpectedSymbol { symbol: String },
    #[error("malformed number {number:?}")]
    MalformedNumber { number: String },
    #[error("unterminated long comment")]
    UnterminatedComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unknown attribute '@{attribute}'")]
    UnknownAttribute { attribute: String },

    // Parse
    #[error("expected {expected}, received {received:?}")]
    UnexpectedToken { expected: String, received: String },
    #[error("expected an expression, received {received:?}")]
    ExpectedExpression { received: String },
    #[error("cannot redefine variable '{variable}'")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable '{variable}' not declared")]
    VariableNotDeclared { variable: String },
    #[error("cannot redefine existing type '{type_}'")]
    TypeAlreadyDeclared { type_: String },
    #[error("constructor function '{function}' cannot have parameters")]
    ConstructorParameters { function: String },
    #[error("constructor function '{function}' must return void")]
    ConstructorReturnType { function: String },
    #[error("cannot have more than one else")]
    MultipleElse,
    #[error("unexpected {received:?} in restricted namespace, expected a type or function definition")]
    RestrictedStatement { received: String },
    #[error("cannot use undefined type '{type_}'")]
    UnknownType { type_: String },
    #[error("cannot resolve symbol '{symbol}'")]
    UnresolvedSymbol { symbol: String },

    // Semantic
    #[error("cannot redefine type '{type_}'")]
    DuplicateType { type_: String },
    #[error("cannot redefine function '{function}'")]
    FunctionAlreadyDeclared { function: String },
    #[error("expression is not callable")]
    NotCallable,
    #[error("too many arguments to '{function}': expected {expected}, received {received}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("missing arguments to '{function}': expected {expected}, received {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("class fields are not supported (type '{class}')")]
    ClassFieldsUnsupported { class: String },
    #[error("type alias '{type_}' refers to itself")]
    CyclicTypeAlias { type_: String },
    #[error("cannot infer the type of {subject}")]
    CannotInferType { subject: String },
    #[error("number '{number}' is out of range for '{type_}'")]
    NumberOverflow { number: String, type_: String },
    #[error("number '{number}' is a floating-point number, expected '{type_}'")]
    FloatInIntegerContext { number: String, type_: String },
    #[error("number '{number}' cannot be negative for unsigned '{type_}'")]
    NegativeUnsigned { number: String, type_: String },
    #[error("number '{number}' cannot be used as '{type_}'")]
    NumberInNonNumericContext { number: String, type_: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
}
