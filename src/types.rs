use std::fmt;

/// Runtime value. The reader produces this tree directly and the evaluator
/// returns it, so there is no separate AST type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Symbol(String),
    Pair(Pair),
    Marker(Marker),
}

/// A cons cell. Either field may be absent; a pair with both fields absent
/// is the canonical empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub car: Option<Box<Value>>,
    pub cdr: Option<Box<Value>>,
}

/// Structural tokens that survive reading in marker form. They only reach
/// the evaluator when an expression is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Dot,
    Quote,
    Close,
}

impl Value {
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(name.to_string())
    }

    pub fn boolean(value: bool) -> Value {
        Value::symbol(if value { "#t" } else { "#f" })
    }

    pub fn empty_list() -> Value {
        Value::Pair(Pair {
            car: None,
            cdr: None,
        })
    }

    pub fn pair(car: Option<Value>, cdr: Option<Value>) -> Value {
        Value::Pair(Pair {
            car: car.map(Box::new),
            cdr: cdr.map(Box::new),
        })
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Value::Pair(pair) if pair.is_empty())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Symbol(name) if name == "#t")
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Value::Symbol(name) if name == "#f")
    }
}

impl Pair {
    pub fn is_empty(&self) -> bool {
        self.car.is_none() && self.cdr.is_none()
    }

    // Writes the cell contents without the enclosing parentheses. A non-empty
    // pair in car position is written in this inner form as well, so its own
    // parentheses disappear into the parent's.
    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        match &self.car {
            None => write!(f, "()")?,
            Some(car) => match car.as_ref() {
                Value::Pair(inner) if !inner.is_empty() => inner.fmt_inner(f)?,
                other => write!(f, "{}", other)?,
            },
        }
        match &self.cdr {
            None => Ok(()),
            Some(cdr) => match cdr.as_ref() {
                Value::Pair(rest) if rest.is_empty() => Ok(()),
                Value::Pair(rest) => {
                    write!(f, " ")?;
                    rest.fmt_inner(f)
                }
                atom => write!(f, " . {}", atom),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Pair(pair) => {
                write!(f, "(")?;
                pair.fmt_inner(f)?;
                write!(f, ")")
            }
            Value::Marker(marker) => write!(f, "{}", marker),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Dot => write!(f, "."),
            Marker::Quote => write!(f, "'"),
            Marker::Close => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    fn sym(name: &str) -> Value {
        Value::symbol(name)
    }

    // Builds a proper list with an absent cdr as the terminator, the same
    // shape the reader produces.
    fn list(elements: Vec<Value>) -> Value {
        let mut rest = None;
        for element in elements.into_iter().rev() {
            rest = Some(Value::pair(Some(element), rest));
        }
        rest.unwrap_or_else(Value::empty_list)
    }

    fn assert_renders(value: Value, expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_render_atoms() {
        assert_renders(int(42), "42");
        assert_renders(int(-7), "-7");
        assert_renders(sym("foo"), "foo");
        assert_renders(sym("#t"), "#t");
    }

    #[test]
    fn test_render_empty_list() {
        assert_renders(Value::empty_list(), "()");
        assert!(Value::empty_list().is_empty_list());
    }

    #[test]
    fn test_render_proper_list() {
        assert_renders(list(vec![int(1), int(2), int(3)]), "(1 2 3)");
        assert_renders(list(vec![sym("+"), int(1), int(2)]), "(+ 1 2)");
    }

    #[test]
    fn test_render_either_terminator() {
        // An absent cdr and an explicit empty list both end a proper list.
        let absent = Value::pair(Some(int(1)), None);
        let explicit = Value::pair(Some(int(1)), Some(Value::empty_list()));
        assert_renders(absent, "(1)");
        assert_renders(explicit, "(1)");
    }

    #[test]
    fn test_render_dotted_pair() {
        assert_renders(Value::pair(Some(int(1)), Some(int(2))), "(1 . 2)");
        assert_renders(
            Value::pair(
                Some(int(1)),
                Some(Value::pair(Some(int(2)), Some(int(3)))),
            ),
            "(1 2 . 3)",
        );
    }

    #[test]
    fn test_pair_car_is_spliced_into_parent() {
        // A non-empty pair in car position loses its own parentheses.
        let nested = list(vec![list(vec![int(1), int(2)]), int(3)]);
        assert_renders(nested, "(1 2 3)");

        let wrapped = Value::pair(Some(list(vec![int(1), int(2)])), None);
        assert_renders(wrapped, "(1 2)");
    }

    #[test]
    fn test_empty_list_element_keeps_its_parentheses() {
        let value = list(vec![Value::empty_list(), int(1)]);
        assert_renders(value, "(() 1)");

        let single = Value::pair(Some(Value::empty_list()), None);
        assert_renders(single, "(())");
    }

    #[test]
    fn test_render_markers() {
        assert_renders(Value::Marker(Marker::Dot), ".");
        assert_renders(Value::Marker(Marker::Quote), "'");
        assert_renders(Value::Marker(Marker::Close), ")");
    }

    #[test]
    fn test_boolean_constructor() {
        assert_renders(Value::boolean(true), "#t");
        assert_renders(Value::boolean(false), "#f");
        assert!(Value::boolean(true).is_true());
        assert!(!Value::boolean(true).is_false());
        assert!(Value::boolean(false).is_false());
        assert!(!Value::boolean(false).is_true());
        assert!(!sym("#true").is_true());
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(int(5).as_integer(), Some(5));
        assert_eq!(sym("5").as_integer(), None);
        assert_eq!(Value::empty_list().as_integer(), None);
    }
}
