//! Lexer and recursive-descent parser for projection expressions.
//!
//! Grammar:
//!
//! ```text
//! expression := path (',' path)*
//! path       := name ('.' name | '[' integer ']')*
//! name       := identifier | '#' identifier
//! ```
//!
//! `#alias` tokens are replaced by their literal attribute name while the path
//! is built, so the resulting [`AttributePath`]s never contain placeholders.
//! Whitespace between tokens is ignored.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::ast::{AttributePath, PathElement};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while compiling a projection expression.
///
/// Every variant is a caller input error; none depends on the item being
/// projected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// The expression is empty or only whitespace.
    #[error("The expression can not be empty;")]
    EmptyExpression,
    /// An unexpected token was encountered.
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },
    /// The expression ended in the middle of a path.
    #[error("Unexpected end of expression")]
    UnexpectedEof,
    /// A character that cannot appear in a projection expression.
    #[error("Syntax error; invalid character '{ch}' at position {position}")]
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Byte offset in the expression.
        position: usize,
    },
    /// A list index that is not a non-negative integer.
    #[error("Invalid list index: expected a non-negative integer, found {found}")]
    InvalidIndex {
        /// What appeared inside the brackets.
        found: String,
    },
    /// A `#name` placeholder that is missing from the name table.
    #[error(
        "An expression attribute name used in the document path is not defined; attribute name: {name}"
    )]
    UnresolvedName {
        /// The unresolved placeholder, including `#`.
        name: String,
    },
    /// A `:value` placeholder, which has no meaning in a projection.
    #[error("Expression attribute values are not allowed in a projection; found {name}")]
    ValueNotAllowed {
        /// The value placeholder, including `:`.
        name: String,
    },
    /// Two requested paths overlap (equal, or one contains the other).
    #[error(
        "Two document paths overlap with each other; must remove or rewrite one of these paths; path one: {first}, path two: {second}"
    )]
    PathOverlap {
        /// Step list of the earlier path.
        first: String,
        /// Step list of the later path.
        second: String,
    },
    /// The expression exceeds the configured size.
    #[error(
        "Expression size has exceeded the maximum allowed size; expression size: {size}, max: {max}"
    )]
    ExpressionTooLong {
        /// Expression size in bytes.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
    /// A path has more steps than the configured depth.
    #[error(
        "The document path has too many nesting levels; nesting levels: {depth}, max: {max}"
    )]
    PathTooDeep {
        /// Number of steps in the path, root included.
        depth: usize,
        /// Configured maximum.
        max: usize,
    },
}

// ---------------------------------------------------------------------------
// Token type
// ---------------------------------------------------------------------------

/// Lexer token for projection expressions.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// A plain identifier (attribute name).
    Identifier(String),
    /// An expression attribute name reference (`#name`), stored with the `#`.
    ExprAttrName(String),
    /// An expression attribute value reference (`:value`), stored with the `:`.
    ExprAttrValue(String),
    /// A run of decimal digits.
    Number(String),
    /// `-`
    Minus,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// End of input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(s) => write!(f, "identifier '{s}'"),
            Self::ExprAttrName(s) | Self::ExprAttrValue(s) => f.write_str(s),
            Self::Number(n) => f.write_str(n),
            Self::Minus => f.write_str("'-'"),
            Self::Dot => f.write_str("'.'"),
            Self::Comma => f.write_str("','"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::Eof => f.write_str("EOF"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Tokenizer for projection expression strings.
struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenize the entire input; the result always ends with `Token::Eof`.
    fn tokenize(&mut self) -> Result<Vec<Token>, ExpressionError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn next_token(&mut self) -> Result<Token, ExpressionError> {
        self.skip_whitespace();

        let Some(&(position, ch)) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        let single = match ch {
            '#' => return self.read_placeholder('#').map(Token::ExprAttrName),
            ':' => return self.read_placeholder(':').map(Token::ExprAttrValue),
            c if c.is_ascii_digit() => return Ok(Token::Number(self.read_while(is_digit))),
            c if is_ident_start(c) => {
                return Ok(Token::Identifier(self.read_while(is_ident_continue)));
            }
            '-' => Token::Minus,
            '.' => Token::Dot,
            ',' => Token::Comma,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            _ => return Err(ExpressionError::InvalidCharacter { ch, position }),
        };
        self.chars.next();
        Ok(single)
    }

    /// Read `#name` or `:name`, keeping the prefix in the returned string.
    fn read_placeholder(&mut self, prefix: char) -> Result<String, ExpressionError> {
        self.chars.next(); // consume prefix
        let name = self.read_while(is_ident_continue);
        if name.is_empty() {
            return Err(ExpressionError::UnexpectedToken {
                expected: format!("name after '{prefix}'"),
                found: self
                    .chars
                    .peek()
                    .map_or_else(|| "EOF".to_owned(), |(_, c)| format!("'{c}'")),
            });
        }
        Ok(format!("{prefix}{name}"))
    }

    fn read_while(&mut self, accept: fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !accept(c) {
                break;
            }
            s.push(c);
            self.chars.next();
        }
        s
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns `true` if `c` can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive-descent parser for projection expressions.
struct Parser<'n> {
    tokens: Vec<Token>,
    pos: usize,
    names: &'n HashMap<String, String>,
    referenced: BTreeSet<String>,
}

impl<'n> Parser<'n> {
    fn new(tokens: Vec<Token>, names: &'n HashMap<String, String>) -> Self {
        Self {
            tokens,
            pos: 0,
            names,
            referenced: BTreeSet::new(),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExpressionError> {
        let tok = self.advance();
        if &tok == expected {
            Ok(())
        } else if tok == Token::Eof {
            Err(ExpressionError::UnexpectedEof)
        } else {
            Err(ExpressionError::UnexpectedToken {
                expected: expected.to_string(),
                found: tok.to_string(),
            })
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    /// Parse comma-separated paths up to the end of input.
    fn parse_projection_expr(&mut self) -> Result<Vec<AttributePath>, ExpressionError> {
        if self.at_end() {
            return Err(ExpressionError::EmptyExpression);
        }

        let mut paths = vec![self.parse_attribute_path()?];
        loop {
            match self.peek() {
                Token::Comma => {
                    self.advance();
                    paths.push(self.parse_attribute_path()?);
                }
                Token::Eof => return Ok(paths),
                other => {
                    return Err(ExpressionError::UnexpectedToken {
                        expected: "',' or end of expression".to_owned(),
                        found: other.to_string(),
                    });
                }
            }
        }
    }

    /// Parse a path like `info.rating`, `#name`, `myList[0].value`.
    fn parse_attribute_path(&mut self) -> Result<AttributePath, ExpressionError> {
        let mut path = AttributePath::new(self.parse_name()?);

        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    let name = self.parse_name()?;
                    path.push(PathElement::Attribute(name));
                }
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_index()?;
                    self.expect(&Token::RBracket)?;
                    path.push(PathElement::Index(index));
                }
                _ => return Ok(path),
            }
        }
    }

    /// Parse a name segment, substituting `#alias` references.
    fn parse_name(&mut self) -> Result<String, ExpressionError> {
        match self.advance() {
            Token::Identifier(name) => Ok(name),
            Token::ExprAttrName(alias) => {
                let Some(name) = self.names.get(&alias) else {
                    return Err(ExpressionError::UnresolvedName { name: alias });
                };
                let name = name.clone();
                self.referenced.insert(alias);
                Ok(name)
            }
            Token::ExprAttrValue(name) => Err(ExpressionError::ValueNotAllowed { name }),
            Token::Eof => Err(ExpressionError::UnexpectedEof),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "attribute name or #name".to_owned(),
                found: other.to_string(),
            }),
        }
    }

    /// Parse the integer inside `[...]`.
    fn parse_index(&mut self) -> Result<usize, ExpressionError> {
        match self.advance() {
            Token::Number(digits) => digits
                .parse()
                .map_err(|_| ExpressionError::InvalidIndex { found: digits }),
            Token::Eof => Err(ExpressionError::UnexpectedEof),
            other => Err(ExpressionError::InvalidIndex {
                found: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The result of parsing a projection expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProjection {
    /// Paths in the order they appear in the expression.
    pub paths: Vec<AttributePath>,
    /// The `#alias` keys the expression referenced, with their `#` prefix.
    pub referenced_names: BTreeSet<String>,
}

/// Parse a projection expression, keeping track of which aliases were used.
///
/// # Errors
///
/// Returns `ExpressionError` if the expression is empty, syntactically
/// invalid, or references an alias missing from `names`.
#[allow(clippy::implicit_hasher)]
pub fn parse_projection_expression(
    input: &str,
    names: &HashMap<String, String>,
) -> Result<ParsedProjection, ExpressionError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser::new(tokens, names);
    let paths = parser.parse_projection_expr()?;
    Ok(ParsedProjection {
        paths,
        referenced_names: parser.referenced,
    })
}

/// Parse a projection expression (comma-separated attribute paths).
///
/// # Errors
///
/// Returns `ExpressionError` if the expression is empty, syntactically
/// invalid, or references an alias missing from `names`.
#[allow(clippy::implicit_hasher)]
pub fn parse_projection(
    input: &str,
    names: &HashMap<String, String>,
) -> Result<Vec<AttributePath>, ExpressionError> {
    parse_projection_expression(input, names).map(|parsed| parsed.paths)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
