use logos::Logos;
use std::fmt;
use thiserror::Error;

use crate::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n]+")] // Skip whitespace: space, tab, newline only
#[logos(error = LexerErrorKind)]
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(".")]
    Dot,
    #[token("'")]
    Quote,
    // A lone +, - or / names a procedure; a sign directly followed by digits
    // lexes as an integer instead through the longest-match rule.
    #[regex(r"[A-Za-z#*<=>][A-Za-z0-9#*<=>!?+-]*", |lex| lex.slice().to_string())]
    #[token("+", |lex| lex.slice().to_string())]
    #[token("-", |lex| lex.slice().to_string())]
    #[token("/", |lex| lex.slice().to_string())]
    Symbol(String),
    #[regex(r"[+-]?[0-9]+", |lex| {
        let slice = lex.slice();
        slice
            .parse::<i64>()
            .map_err(|_| LexerErrorKind::IntegerOverflow(slice.to_string()))
    })]
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

// Implement Display for easy printing
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Quote => write!(f, "'"),
            TokenKind::Symbol(s) => write!(f, "{}", s),
            TokenKind::Integer(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Error)]
pub enum LexerErrorKind {
    #[error("Integer literal '{0}' does not fit in 64 bits")]
    IntegerOverflow(String),
    #[default]
    #[error("Invalid character")]
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct LexerError {
    pub error: LexerErrorKind,
    pub span: Span,
}

// Result type alias for convenience
pub type LexerResult<T> = Result<T, LexerError>;

// Helper function to tokenize a string eagerly (useful for tests and benches)
pub fn tokenize(input: &str) -> LexerResult<Vec<Token>> {
    TokenKind::lexer(input)
        .spanned()
        .map(|(result, range)| match result {
            Ok(kind) => Ok(Token {
                kind,
                span: Span::new(range.start, range.end),
            }),
            Err(error) => Err(LexerError {
                error,
                span: Span::new(range.start, range.end),
            }),
        })
        .collect()
}

/// Pull cursor over the token stream. The parser inspects `current()` and
/// consumes it with `advance()`; `at_end()` becomes true only once a token
/// failed to be produced because the input ran out.
pub struct Tokenizer<'a> {
    tokens: logos::SpannedIter<'a, TokenKind>,
    current: Option<Token>,
    exhausted: bool,
}

impl<'a> Tokenizer<'a> {
    /// Primes the cursor on the first token of `input`.
    pub fn new(input: &'a str) -> LexerResult<Self> {
        let mut tokenizer = Tokenizer {
            tokens: TokenKind::lexer(input).spanned(),
            current: None,
            exhausted: false,
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn at_end(&self) -> bool {
        self.exhausted
    }

    pub fn advance(&mut self) -> LexerResult<()> {
        match self.tokens.next() {
            None => {
                self.current = None;
                self.exhausted = true;
            }
            Some((Ok(kind), range)) => {
                self.current = Some(Token {
                    kind,
                    span: Span::new(range.start, range.end),
                });
            }
            Some((Err(error), range)) => {
                self.current = None;
                return Err(LexerError {
                    error,
                    span: Span::new(range.start, range.end),
                });
            }
        }
        Ok(())
    }
}
