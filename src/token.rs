//! Token stream abstraction consumed by the decoding engine.
//!
//! The engine never looks at raw input. It reads one [`Token`] at a time
//! through the [`TokenView`] trait, which any structured-text parser can
//! implement. Two implementations ship with the crate:
//!
//! - [`TokenBuffer`]: an in-memory cursor over already-produced tokens
//! - [`TextTokens`](crate::lexer::TextTokens): a small JSON-like tokenizer
//!
//! ## Examples
//!
//! ```rust
//! use scalar_coercion::{Token, TokenBuffer, TokenKind, TokenView};
//!
//! let mut tokens = TokenBuffer::new(vec![Token::StartArray, Token::Int(5), Token::EndArray]);
//! assert_eq!(tokens.current_kind(), TokenKind::StartArray);
//! assert_eq!(tokens.advance().unwrap().kind(), TokenKind::Int);
//! assert_eq!(tokens.as_int(), Some(5));
//! ```

use crate::Result;
use std::fmt;

/// A position in the source input.
///
/// Lines and columns are 1-based, `offset` is a 0-based byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Location {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single token of a structured-text stream, with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName(String),
    String(String),
    Int(i128),
    Float(f64),
    True,
    False,
    Null,
    EndOfInput,
}

impl Token {
    /// Returns the payload-free kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Token::StartObject => TokenKind::StartObject,
            Token::EndObject => TokenKind::EndObject,
            Token::StartArray => TokenKind::StartArray,
            Token::EndArray => TokenKind::EndArray,
            Token::FieldName(_) => TokenKind::FieldName,
            Token::String(_) => TokenKind::String,
            Token::Int(_) => TokenKind::Int,
            Token::Float(_) => TokenKind::Float,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Null => TokenKind::Null,
            Token::EndOfInput => TokenKind::EndOfInput,
        }
    }
}

/// The kind of a [`Token`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName,
    String,
    Int,
    Float,
    True,
    False,
    Null,
    EndOfInput,
}

impl TokenKind {
    /// Human-readable description of what this token represents.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            TokenKind::StartObject => "Object value",
            TokenKind::EndObject => "end of Object",
            TokenKind::StartArray => "Array value",
            TokenKind::EndArray => "end of Array",
            TokenKind::FieldName => "property name",
            TokenKind::String => "String value",
            TokenKind::Int => "Integer value",
            TokenKind::Float => "Floating-point value",
            TokenKind::True | TokenKind::False => "Boolean value",
            TokenKind::Null => "Null value",
            TokenKind::EndOfInput => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token `{:?}`)", self.describe(), self)
    }
}

/// A cursor over a token stream.
///
/// Implementors only need [`current`](TokenView::current),
/// [`advance`](TokenView::advance) and [`location`](TokenView::location);
/// the typed accessors are derived from the current token.
pub trait TokenView {
    /// The token under the cursor. [`Token::EndOfInput`] once the stream is exhausted.
    fn current(&self) -> &Token;

    /// Moves to the next token and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot produce the next token.
    fn advance(&mut self) -> Result<&Token>;

    /// Source position of the current token.
    fn location(&self) -> Location;

    fn current_kind(&self) -> TokenKind {
        self.current().kind()
    }

    /// Text of the current string or property-name token.
    fn raw_text(&self) -> Option<&str> {
        match self.current() {
            Token::String(s) | Token::FieldName(s) => Some(s),
            _ => None,
        }
    }

    /// Value of the current integer token.
    fn as_int(&self) -> Option<i128> {
        match self.current() {
            Token::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Value of the current float token, truncated towards zero.
    ///
    /// Returns `None` for other tokens and for floats that do not fit an `i64`.
    fn as_float_as_int(&self) -> Option<i64> {
        match self.current() {
            Token::Float(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Some(f.trunc() as i64)
            }
            _ => None,
        }
    }
}

impl<V: TokenView + ?Sized> TokenView for &mut V {
    fn current(&self) -> &Token {
        (**self).current()
    }

    fn advance(&mut self) -> Result<&Token> {
        (**self).advance()
    }

    fn location(&self) -> Location {
        (**self).location()
    }
}

/// An in-memory [`TokenView`] over pre-tokenized input.
///
/// The cursor starts on the first token. Advancing past the last token
/// yields [`Token::EndOfInput`] forever.
#[derive(Clone, Debug)]
pub struct TokenBuffer {
    tokens: Vec<(Token, Location)>,
    position: usize,
    end: Token,
}

impl TokenBuffer {
    /// Creates a buffer, assigning each token a synthetic location on line 1
    /// (column = token index + 1).
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let located = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| (token, Location::new(1, i + 1, i)))
            .collect();
        Self::with_locations(located)
    }

    /// Creates a buffer from tokens with known source locations.
    #[must_use]
    pub fn with_locations(tokens: Vec<(Token, Location)>) -> Self {
        TokenBuffer {
            tokens,
            position: 0,
            end: Token::EndOfInput,
        }
    }

    fn token_at(&self, position: usize) -> &Token {
        self.tokens
            .get(position)
            .map_or(&self.end, |(token, _)| token)
    }

    /// Number of tokens not yet consumed, including the current one.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }
}

impl TokenView for TokenBuffer {
    fn current(&self) -> &Token {
        self.token_at(self.position)
    }

    fn advance(&mut self) -> Result<&Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        Ok(self.token_at(self.position))
    }

    fn location(&self) -> Location {
        match self.tokens.get(self.position) {
            Some((_, location)) => *location,
            None => self
                .tokens
                .last()
                .map(|(_, loc)| Location::new(loc.line, loc.column + 1, loc.offset + 1))
                .unwrap_or_default(),
        }
    }
}
