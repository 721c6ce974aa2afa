//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_LOOKUP!` - Builds a `HashMap` from `key => value` pairs, used by the
//!   static keyword, symbol, attribute and built-in type tables

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's text, anything convertible into a `String`
/// * `$start` - Position of the first character
/// * `$end` - Position just past the last character
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42", start, end);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $start:expr, $end:expr) => {
        Token {
            kind: $kind,
            value: String::from($value),
            span: $crate::Span {
                start: $start,
                end: $end,
            },
        }
    };
}

/// Builds a `HashMap` from a list of `key => value` pairs.
///
/// # Example
///
/// ```ignore
/// let map: HashMap<&'static str, TokenKind> = MK_LOOKUP! {
///     "fn" => TokenKind::Fn,
///     "if" => TokenKind::If,
/// };
/// ```
#[macro_export]
macro_rules! MK_LOOKUP {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = ::std::collections::HashMap::new();
        $(map.insert($key, $value);)*
        map
    }};
}
