use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{Span, MK_LOOKUP};

lazy_static! {
    /// Reserved words. Only consulted for words that are entirely lowercase
    /// and free of underscores.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = MK_LOOKUP! {
        "fn" => TokenKind::Fn,
        "extern" => TokenKind::Extern,
        "as" => TokenKind::As,
        "return" => TokenKind::Return,
        "type" => TokenKind::Type,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "switch" => TokenKind::Switch,
        "throw" => TokenKind::Throw,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "if" => TokenKind::If,
        "elseif" => TokenKind::Elseif,
        "else" => TokenKind::Else,
    };

    /// One and two character symbols. The lexer tries the two character
    /// slice first so `<=` never lexes as `<` followed by `=`.
    pub static ref SYMBOL_LOOKUP: HashMap<&'static str, TokenKind> = MK_LOOKUP! {
        "+" => TokenKind::Plus,
        "+=" => TokenKind::PlusEquals,
        "-" => TokenKind::Dash,
        "-=" => TokenKind::DashEquals,
        "*" => TokenKind::Star,
        "*=" => TokenKind::StarEquals,
        "/" => TokenKind::Slash,
        "/=" => TokenKind::SlashEquals,
        "%" => TokenKind::Percent,
        "%=" => TokenKind::PercentEquals,
        "(" => TokenKind::OpenParen,
        ")" => TokenKind::CloseParen,
        "[" => TokenKind::OpenBracket,
        "]" => TokenKind::CloseBracket,
        "{" => TokenKind::OpenCurly,
        "}" => TokenKind::CloseCurly,
        "->" => TokenKind::Arrow,
        "=" => TokenKind::Assignment,
        "!" => TokenKind::Not,
        "?" => TokenKind::Question,
        ":" => TokenKind::Colon,
        ":=" => TokenKind::ColonEquals,
        "," => TokenKind::Comma,
        "==" => TokenKind::Equals,
        "!=" => TokenKind::NotEquals,
        "<" => TokenKind::Less,
        "<=" => TokenKind::LessEquals,
        ">" => TokenKind::Greater,
        ">=" => TokenKind::GreaterEquals,
        "&&" => TokenKind::And,
        "||" => TokenKind::Or,
    };

    pub static ref ATTRIBUTE_LOOKUP: HashMap<&'static str, Attribute> = MK_LOOKUP! {
        "constructor" => Attribute::Constructor,
        "export" => Attribute::Export,
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,
    Attribute,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment,  // =
    ColonEquals, // :=
    Equals,      // ==
    Not,         // !
    NotEquals,   // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Colon,
    Question,
    Comma,
    Arrow,

    PlusEquals,
    DashEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Fn,
    Extern,
    As,
    Return,
    Type,
    Try,
    Catch,
    Switch,
    Throw,
    True,
    False,
    While,
    For,
    If,
    Elseif,
    Else,
}

impl TokenKind {
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::PlusEquals
                | TokenKind::DashEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
        )
    }

    /// How the kind reads in a diagnostic, e.g. "`)`" or "identifier".
    pub fn describe(&self) -> String {
        match self {
            TokenKind::EOF => return String::from("end of file"),
            TokenKind::Number => return String::from("number"),
            TokenKind::String => return String::from("string"),
            TokenKind::Identifier => return String::from("identifier"),
            TokenKind::Attribute => return String::from("attribute"),
            _ => {}
        }

        SYMBOL_LOOKUP
            .iter()
            .chain(RESERVED_LOOKUP.iter())
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| format!("`{}`", text))
            .unwrap_or_else(|| self.to_string())
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Function attributes accepted after `@`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Attribute {
    Constructor,
    Export,
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Constructor => write!(f, "@constructor"),
            Attribute::Export => write!(f, "@export"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::Attribute => {
                write!(f, "{}({})", self.kind, self.value)
            }
            TokenKind::String => write!(f, "{}({:?})", self.kind, self.value),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl Token {
    /// Text used when the token shows up in a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::from("end of file"),
            TokenKind::String => format!("\"{}\"", self.value),
            TokenKind::Attribute => format!("@{}", self.value),
            _ => self.value.clone(),
        }
    }
}
