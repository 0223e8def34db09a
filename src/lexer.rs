//! A small JSON-like tokenizer.
//!
//! [`TextTokens`] turns text into the [`Token`] stream the decoding engine
//! consumes. It only tokenizes: it does not check that brackets balance or
//! that values are separated by commas. That is the job of whatever builds
//! objects on top of the stream.
//!
//! Recognized input:
//!
//! - `[` `]` `{` `}`, with `,` treated as a separator
//! - `"quoted strings"` with the usual escapes; a string followed by `:` is a
//!   property name
//! - numbers: integers, decimals and exponents (`-12`, `2.0`, `1e3`)
//! - `true`, `false`, `null`
//!
//! ```rust
//! use scalar_coercion::{TextTokens, Token, TokenView};
//!
//! let mut tokens = TextTokens::new("[5, 6]").unwrap();
//! assert_eq!(tokens.current(), &Token::StartArray);
//! assert_eq!(tokens.advance().unwrap(), &Token::Int(5));
//! assert_eq!(tokens.advance().unwrap(), &Token::Int(6));
//! assert_eq!(tokens.advance().unwrap(), &Token::EndArray);
//! ```

use crate::token::{Location, Token, TokenView};
use crate::{Error, Result};
use std::num::IntErrorKind;

/// Tokenizer over borrowed text, positioned on one token at a time.
pub struct TextTokens<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    current: Token,
    current_location: Location,
}

impl<'a> TextTokens<'a> {
    /// Creates a tokenizer positioned on the first token of `input`.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the first token is malformed.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut tokens = TextTokens {
            input,
            position: 0,
            line: 1,
            column: 1,
            current: Token::EndOfInput,
            current_location: Location::default(),
        };
        tokens.lex_next()?;
        Ok(tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Skips whitespace and `,` separators.
    fn skip_separators(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == ',' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn here(&self) -> Location {
        Location::new(self.line, self.column, self.position)
    }

    fn lex_next(&mut self) -> Result<()> {
        self.skip_separators();
        self.current_location = self.here();

        let token = match self.peek_char() {
            None => Token::EndOfInput,
            Some('[') => self.single(Token::StartArray),
            Some(']') => self.single(Token::EndArray),
            Some('{') => self.single(Token::StartObject),
            Some('}') => self.single(Token::EndObject),
            Some('"') => {
                let text = self.parse_string()?;
                self.skip_whitespace_same_line();
                if self.peek_char() == Some(':') {
                    self.next_char();
                    Token::FieldName(text)
                } else {
                    Token::String(text)
                }
            }
            Some(ch) if ch.is_ascii_digit() || ch == '-' => self.parse_number()?,
            Some(_) => self.parse_literal()?,
        };

        self.current = token;
        Ok(())
    }

    fn single(&mut self, token: Token) -> Token {
        self.next_char();
        token
    }

    fn skip_whitespace_same_line(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == ' ' || ch == '\t' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.next_char(); // opening quote
        let mut result = String::new();

        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => match self.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('/') => result.push('/'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(_) => {
                        return Err(Error::syntax(
                            self.line,
                            self.column,
                            "Invalid escape sequence in string",
                        ))
                    }
                    None => {
                        return Err(Error::syntax(
                            self.line,
                            self.column,
                            "Unexpected end of input in string",
                        ))
                    }
                },
                other => result.push(other),
            }
        }
        Err(Error::syntax(self.line, self.column, "Unterminated string"))
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.next_char() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(Error::syntax(
                        self.line,
                        self.column,
                        "Invalid unicode escape sequence (expected 4 hex digits)",
                    ))
                }
            }
        }

        let code_point = u32::from_str_radix(&hex, 16)
            .map_err(|_| Error::syntax(self.line, self.column, "Invalid hex in unicode escape"))?;
        char::from_u32(code_point)
            .ok_or_else(|| Error::syntax(self.line, self.column, "Invalid unicode code point"))
    }

    fn parse_number(&mut self) -> Result<Token> {
        let start = self.position;
        let location = self.here();

        if self.peek_char() == Some('-') {
            self.next_char();
        }

        let mut is_float = false;
        while let Some(ch) = self.peek_char() {
            match ch {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if is_float => {}
                _ => break,
            }
            self.next_char();
        }

        let number_str = &self.input[start..self.position];
        if is_float {
            number_str
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| Error::syntax(location.line, location.column, "Invalid float"))
        } else {
            number_str.parse::<i128>().map(Token::Int).map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    Error::overflow("i128", number_str, location)
                }
                _ => Error::syntax(location.line, location.column, "Invalid integer"),
            })
        }
    }

    fn parse_literal(&mut self) -> Result<Token> {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }

        match &self.input[start..self.position] {
            "true" => Ok(Token::True),
            "false" => Ok(Token::False),
            "null" => Ok(Token::Null),
            "" => Err(Error::syntax(
                self.current_location.line,
                self.current_location.column,
                "Unexpected character",
            )),
            _ => Err(Error::syntax(
                self.current_location.line,
                self.current_location.column,
                "Unrecognized token (expected `true`, `false` or `null`)",
            )),
        }
    }
}

impl TokenView for TextTokens<'_> {
    fn current(&self) -> &Token {
        &self.current
    }

    fn advance(&mut self) -> Result<&Token> {
        if self.current != Token::EndOfInput {
            self.lex_next()?;
        }
        Ok(&self.current)
    }

    fn location(&self) -> Location {
        self.current_location
    }
}
