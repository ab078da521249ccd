use crate::registry::{Registry, builtins};
use crate::types::{Marker, Value};
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Unbound operator '{0}'")]
    UnboundOperator(String),
    #[error("A non-empty list needs an operator in head position")]
    MissingOperator,
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Expected {expected}, got '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("Index {index} is out of range for a list of length {length}")]
    IndexOutOfRange { index: i64, length: usize },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("'{0}' is not a complete expression")]
    StrayMarker(Marker),
}

// Result type alias for convenience
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Walks a Value tree and reduces it to a result Value. The registry it
/// resolves operators against is borrowed, so callers can inject their own
/// table; `new` borrows the shared builtin one.
pub struct Evaluator<'a> {
    registry: &'a Registry,
}

impl Evaluator<'static> {
    pub fn new() -> Self {
        Evaluator {
            registry: builtins(),
        }
    }
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl<'a> Evaluator<'a> {
    pub fn with_registry(registry: &'a Registry) -> Self {
        Evaluator { registry }
    }

    /// Integers and symbols evaluate to themselves. A pair is a call: its
    /// rendered car names the operator, and the primitive receives the cdr
    /// as the unevaluated argument chain. Markers never evaluate.
    pub fn evaluate(&self, value: &Value) -> EvalResult {
        match value {
            Value::Integer(_) | Value::Symbol(_) => Ok(value.clone()),
            Value::Marker(marker) => Err(EvalError::StrayMarker(*marker)),
            Value::Pair(pair) => {
                let Some(operator) = pair.car.as_deref() else {
                    return Err(EvalError::MissingOperator);
                };
                let name = operator.to_string();
                let Some(primitive) = self.registry.lookup(&name) else {
                    return Err(EvalError::UnboundOperator(name));
                };
                primitive(pair.cdr.as_deref(), self)
            }
        }
    }

    /// Evaluates an argument chain into an ordered sequence. Elements along
    /// the list spine are evaluated; an atom in cdr position ends the chain
    /// and is kept unevaluated.
    pub fn flatten(&self, head: Option<&Value>) -> EvalResult<Vec<Value>> {
        let mut elements = Vec::new();
        let mut cursor = head;
        while let Some(value) = cursor {
            match value {
                Value::Pair(pair) => {
                    if pair.is_empty() {
                        break;
                    }
                    if let Some(car) = pair.car.as_deref() {
                        elements.push(self.evaluate(car)?);
                    }
                    cursor = pair.cdr.as_deref();
                }
                atom => {
                    elements.push(atom.clone());
                    break;
                }
            }
        }
        Ok(elements)
    }
}
