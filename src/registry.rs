use crate::evaluator::{EvalResult, Evaluator};
use crate::types::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Signature shared by every primitive: the unevaluated cdr of the invoking
/// pair, plus the evaluator driving the call so the primitive can evaluate
/// the operands it needs.
pub type PrimitiveFn = fn(Option<&Value>, &Evaluator) -> EvalResult;

/// Operator table the evaluator resolves names against. Callers may build
/// their own (starting empty or from the builtins) and hand it to
/// `Evaluator::with_registry`; the table is read-only once evaluation starts.
#[derive(Clone)]
pub struct Registry {
    entries: HashMap<String, PrimitiveFn>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry holding every builtin primitive.
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();

        // Numbers
        registry.register("number?", crate::primitives::prim_is_number);
        registry.register("=", crate::primitives::prim_equals);
        registry.register(">", crate::primitives::prim_greater_than);
        registry.register("<", crate::primitives::prim_less_than);
        registry.register(">=", crate::primitives::prim_greater_than_or_equals);
        registry.register("<=", crate::primitives::prim_less_than_or_equals);
        registry.register("+", crate::primitives::prim_add);
        registry.register("-", crate::primitives::prim_sub);
        registry.register("*", crate::primitives::prim_mul);
        registry.register("/", crate::primitives::prim_div);
        registry.register("max", crate::primitives::prim_max);
        registry.register("min", crate::primitives::prim_min);
        registry.register("abs", crate::primitives::prim_abs);

        // Quoting and booleans
        registry.register("quote", crate::primitives::prim_quote);
        registry.register("'", crate::primitives::prim_quote);
        registry.register("boolean?", crate::primitives::prim_is_boolean);
        registry.register("not", crate::primitives::prim_not);
        registry.register("and", crate::primitives::prim_and);
        registry.register("or", crate::primitives::prim_or);

        // Lists
        registry.register("null?", crate::primitives::prim_is_null);
        registry.register("list", crate::primitives::prim_list);
        registry.register("list?", crate::primitives::prim_is_list);
        registry.register("list-ref", crate::primitives::prim_list_ref);
        registry.register("list-tail", crate::primitives::prim_list_tail);
        registry.register("car", crate::primitives::prim_car);
        registry.register("cdr", crate::primitives::prim_cdr);
        registry.register("cons", crate::primitives::prim_cons);
        registry.register("pair?", crate::primitives::prim_is_pair);

        registry
    }

    /// Binds `name` to a primitive, replacing any previous binding.
    pub fn register(&mut self, name: &str, primitive: PrimitiveFn) {
        self.entries.insert(name.to_string(), primitive);
    }

    pub fn lookup(&self, name: &str) -> Option<PrimitiveFn> {
        self.entries.get(name).copied()
    }

    /// All registered names, sorted. Used by completion in the REPL.
    pub fn identifiers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_builtins()
    }
}

// Shared builtin table, built once on first use.
static BUILTINS: LazyLock<Registry> = LazyLock::new(Registry::with_builtins);

pub fn builtins() -> &'static Registry {
    &BUILTINS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn eval_with(registry: &Registry, input: &str) -> String {
        let value = parse_str(input).expect("input parses");
        Evaluator::with_registry(registry)
            .evaluate(&value)
            .expect("evaluation succeeds")
            .to_string()
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = Registry::with_builtins();
        assert!(registry.lookup("+").is_some());
        assert!(registry.lookup("car").is_some());
        assert!(registry.lookup("list-tail").is_some());
        assert!(registry.lookup("'").is_some());
        assert!(registry.lookup("lambda").is_none());
        assert!(registry.lookup("define").is_none());
    }

    #[test]
    fn test_empty_registry_binds_nothing() {
        let registry = Registry::new();
        assert!(registry.lookup("+").is_none());
        assert!(registry.identifiers().is_empty());
    }

    #[test]
    fn test_default_is_populated() {
        assert!(Registry::default().lookup("cons").is_some());
    }

    #[test]
    fn test_identifiers_are_sorted() {
        let names = registry_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 28);
        assert!(names.contains(&"quote".to_string()));
        assert!(names.contains(&"null?".to_string()));
    }

    fn registry_names() -> Vec<String> {
        Registry::with_builtins().identifiers()
    }

    #[test]
    fn test_custom_primitive_through_the_evaluator() {
        fn prim_first_or_zero(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
            let elements = evaluator.flatten(args)?;
            Ok(elements.into_iter().next().unwrap_or(Value::Integer(0)))
        }

        let mut registry = Registry::with_builtins();
        registry.register("first-or-zero", prim_first_or_zero);

        assert_eq!(eval_with(&registry, "(first-or-zero (+ 1 2) 9)"), "3");
        assert_eq!(eval_with(&registry, "(first-or-zero)"), "0");
        // Builtins keep working through a custom table.
        assert_eq!(eval_with(&registry, "(* 2 3)"), "6");
    }

    #[test]
    fn test_rebinding_a_builtin() {
        fn prim_always_seven(_args: Option<&Value>, _evaluator: &Evaluator) -> EvalResult {
            Ok(Value::Integer(7))
        }

        let mut registry = Registry::with_builtins();
        registry.register("+", prim_always_seven);
        assert_eq!(eval_with(&registry, "(+ 1 2)"), "7");
        // The shared builtin table is unaffected.
        assert_eq!(eval_with(builtins(), "(+ 1 2)"), "3");
    }
}
