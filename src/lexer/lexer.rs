use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, ATTRIBUTE_LOOKUP, RESERVED_LOOKUP, SYMBOL_LOOKUP};

/// Handles the text matched by a pattern. Returns `None` for trivia that
/// produces no token.
pub type RegexHandler = fn(&mut Lexer, String) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> RegexPattern {
        RegexPattern {
            regex: Regex::new(pattern).expect("lexer patterns are valid regular expressions"),
            handler,
        }
    }
}

lazy_static! {
    /// Tried in order; every pattern is anchored at the cursor. Anything none
    /// of them match goes through the symbol table.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new(r"^\s+", skip_handler),
        RegexPattern::new(r"^///(?s:.*?)///", skip_handler),
        RegexPattern::new(r"^///", unterminated_comment_handler),
        RegexPattern::new(r"^//[^\n]*", skip_handler),
        RegexPattern::new(r#"^"(?s:[^"\\]|\\.)*""#, string_handler),
        RegexPattern::new(r#"^""#, unterminated_string_handler),
        RegexPattern::new(
            r"^(0x[0-9a-fA-F_]*|[0-9][0-9_]*)(\.[0-9_]*)?[a-zA-Z0-9_]*",
            number_handler,
        ),
        RegexPattern::new(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new(r"^@[a-zA-Z_][a-zA-Z0-9_]*", attribute_handler),
    ];

    /// What a number lexeme must look like as a whole. The number pattern
    /// also takes any identifier characters glued to it, so `123abc` and
    /// `0x_` end up here and are rejected.
    static ref WELL_FORMED_NUMBER: Regex =
        Regex::new(r"^(0x_*[0-9a-fA-F][0-9a-fA-F_]*|[0-9][0-9_]*(\.[0-9_]*)?)$")
            .expect("number pattern is a valid regular expression");
}

/// A cursor over the source text producing one token at a time, with one
/// token of lookahead.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    line_start: usize,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: source.to_string(),
            pos: 0,
            line: 1,
            line_start: 0,
            peeked: None,
        }
    }

    /// Consumes and returns the next token. Once the source is exhausted
    /// every call returns `EOF`.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lex_token(),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, Error> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lex_token()?,
        };

        Ok(self.peeked.insert(token))
    }

    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());

        for (offset, ch) in self.source[self.pos..end].char_indices() {
            if ch == '\n' {
                self.line += 1;
                self.line_start = self.pos + offset + 1;
            }
        }

        self.pos = end;
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn get_position(&self) -> Position {
        let column = self.source[self.line_start..self.pos].chars().count() + 1;
        Position::new(self.line, column as u32)
    }

    fn lex_token(&mut self) -> Result<Token, Error> {
        loop {
            if self.at_eof() {
                let position = self.get_position();
                return Ok(MK_TOKEN!(TokenKind::EOF, "EOF", position, position));
            }

            let matched = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(self.remainder())
                    .map(|found| (pattern.handler, found.as_str().to_string()))
            });

            match matched {
                Some((handler, text)) => {
                    if let Some(token) = handler(self, text)? {
                        return Ok(token);
                    }
                }
                None => return self.lex_symbol(),
            }
        }
    }

    fn lex_symbol(&mut self) -> Result<Token, Error> {
        let start = self.get_position();
        let remainder = self.remainder();
        let symbol = remainder.chars().next().map(String::from).unwrap_or_default();

        let longest = [2, 1].into_iter().find_map(|length| {
            remainder
                .get(..length)
                .and_then(|slice| SYMBOL_LOOKUP.get(slice).map(|kind| (*kind, slice.to_string())))
        });

        match longest {
            Some((kind, text)) => {
                self.advance_n(text.len());
                Ok(MK_TOKEN!(kind, text, start, self.get_position()))
            }
            None => Err(Error::new(ErrorImpl::UnexpectedSymbol { symbol }, start)),
        }
    }

    fn push_token(&mut self, kind: TokenKind, value: String, length: usize) -> Token {
        let start = self.get_position();
        self.advance_n(length);
        MK_TOKEN!(kind, value, start, self.get_position())
    }
}

fn skip_handler(lexer: &mut Lexer, matched: String) -> Result<Option<Token>, Error> {
    lexer.advance_n(matched.len());
    Ok(None)
}

fn unterminated_comment_handler(lexer: &mut Lexer, _matched: String) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedComment, lexer.get_position()))
}

fn unterminated_string_handler(lexer: &mut Lexer, _matched: String) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.get_position()))
}

fn number_handler(lexer: &mut Lexer, matched: String) -> Result<Option<Token>, Error> {
    if !WELL_FORMED_NUMBER.is_match(&matched) {
        return Err(Error::new(
            ErrorImpl::MalformedNumber { number: matched },
            lexer.get_position(),
        ));
    }

    let length = matched.len();
    Ok(Some(lexer.push_token(TokenKind::Number, matched, length)))
}

fn string_handler(lexer: &mut Lexer, matched: String) -> Result<Option<Token>, Error> {
    let literal = &matched[1..matched.len() - 1];
    let value = unescape(literal);

    Ok(Some(lexer.push_token(TokenKind::String, value, matched.len())))
}

fn symbol_handler(lexer: &mut Lexer, matched: String) -> Result<Option<Token>, Error> {
    let kind = if can_be_keyword(&matched) {
        RESERVED_LOOKUP
            .get(matched.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier)
    } else {
        TokenKind::Identifier
    };

    let length = matched.len();
    Ok(Some(lexer.push_token(kind, matched, length)))
}

fn attribute_handler(lexer: &mut Lexer, matched: String) -> Result<Option<Token>, Error> {
    let name = &matched[1..];

    if !ATTRIBUTE_LOOKUP.contains_key(name) {
        return Err(Error::new(
            ErrorImpl::UnknownAttribute {
                attribute: name.to_string(),
            },
            lexer.get_position(),
        ));
    }

    let name = name.to_string();
    Ok(Some(lexer.push_token(TokenKind::Attribute, name, matched.len())))
}

/// A word is only ever a keyword when it is entirely lowercase and has no
/// underscore, so `If` and `_if` stay identifiers.
fn can_be_keyword(word: &str) -> bool {
    word.chars().all(|c| c != '_' && !c.is_ascii_uppercase())
}

fn unescape(literal: &str) -> String {
    let mut result = String::with_capacity(literal.len());
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let escaped = match chars.peek() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            _ => {
                // Unknown escape, keep the backslash
                result.push(ch);
                continue;
            }
        };

        result.push(escaped);
        chars.next();
    }

    result
}

/// Lexes the whole source up front. The returned list always ends with an
/// `EOF` token.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == TokenKind::EOF;
        tokens.push(token);

        if is_eof {
            break;
        }
    }

    tracing::debug!(token_count = tokens.len(), "tokenized source");
    Ok(tokens)
}
