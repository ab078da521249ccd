use crate::evaluator::{EvalError, Evaluator};
use crate::parser::{ParseError, parse_str};
use crate::registry::Registry;
use thiserror::Error;

/// Everything that can go wrong between source text and a rendered result,
/// split by the stage that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Owns an operator registry and drives source text through the reader and
/// the evaluator, rendering the result back to text.
pub struct Interpreter {
    registry: Registry,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_registry(Registry::with_builtins())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Interpreter { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Reads one expression from `input`, evaluates it and renders the
    /// result.
    pub fn run(&self, input: &str) -> Result<String, Error> {
        let value = parse_str(input)?;
        let result = Evaluator::with_registry(&self.registry).evaluate(&value)?;
        Ok(result.to_string())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
