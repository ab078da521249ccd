// Declare modules publicly so they are part of the library interface
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pretty_print;
pub mod primitives;
pub mod registry;
pub mod source;
pub mod types;

pub use evaluator::{EvalError, EvalResult, Evaluator};
pub use interpreter::{Error, Interpreter};
pub use lexer::{LexerError, Token, TokenKind, tokenize};
pub use parser::{ParseError, Parser, parse_str};
pub use registry::{PrimitiveFn, Registry, builtins};
pub use source::Span;
pub use types::{Marker, Pair, Value};
