use crate::evaluator::{EvalError, EvalResult, Evaluator};
use crate::types::Value;

fn arity_error(name: &str, expected: &str, actual: usize) -> EvalError {
    EvalError::InvalidArguments(format!(
        "'{}' expects {} arguments, got {}",
        name, expected, actual
    ))
}

fn type_mismatch(expected: &'static str, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        found: found.to_string(),
    }
}

fn expect_integers(values: &[Value]) -> EvalResult<Vec<i64>> {
    values
        .iter()
        .map(|value| {
            value
                .as_integer()
                .ok_or_else(|| type_mismatch("an integer", value))
        })
        .collect()
}

// Evaluates the argument chain and insists on a single element.
fn single_argument(args: Option<&Value>, evaluator: &Evaluator, name: &str) -> EvalResult {
    let elements = evaluator.flatten(args)?;
    match <[Value; 1]>::try_from(elements) {
        Ok([value]) => Ok(value),
        Err(elements) => Err(arity_error(name, "exactly 1", elements.len())),
    }
}

// Left fold over at least one integer; a lone argument comes back unchanged.
fn fold_integers(
    name: &'static str,
    numbers: &[i64],
    combine: fn(i64, i64) -> Option<i64>,
) -> EvalResult {
    let Some((&first, rest)) = numbers.split_first() else {
        return Err(arity_error(name, "at least 1", 0));
    };
    let mut accumulator = first;
    for &number in rest {
        accumulator = combine(accumulator, number).ok_or(EvalError::Overflow(name))?;
    }
    Ok(Value::Integer(accumulator))
}

fn compare_integers(
    args: Option<&Value>,
    evaluator: &Evaluator,
    compare: fn(i64, i64) -> bool,
) -> EvalResult {
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    // Vacuously true on fewer than two arguments.
    let holds = numbers.windows(2).all(|pair| compare(pair[0], pair[1]));
    Ok(Value::boolean(holds))
}

fn spine_length(value: &Value) -> usize {
    let mut length = 0;
    let mut cursor = Some(value);
    while let Some(Value::Pair(pair)) = cursor {
        if pair.is_empty() {
            break;
        }
        length += 1;
        cursor = pair.cdr.as_deref();
    }
    length
}

// Shared entry for list-ref and list-tail: a target value plus an index.
fn list_and_index(
    args: Option<&Value>,
    evaluator: &Evaluator,
    name: &str,
) -> EvalResult<(Value, i64)> {
    let elements = evaluator.flatten(args)?;
    match <[Value; 2]>::try_from(elements) {
        Ok([target, index]) => {
            let index = index
                .as_integer()
                .ok_or_else(|| type_mismatch("an integer index", &index))?;
            Ok((target, index))
        }
        Err(elements) => Err(arity_error(name, "exactly 2", elements.len())),
    }
}

// --- Numeric primitives ---

pub fn prim_is_number(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let value = single_argument(args, evaluator, "number?")?;
    Ok(Value::boolean(value.as_integer().is_some()))
}

pub fn prim_add(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (+ 1 2 3) -> 6; at least one argument is required
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    fold_integers("+", &numbers, i64::checked_add)
}

pub fn prim_sub(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (- 10 3 2) -> 5
    // (- 5) -> 5; there is no unary negation
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    fold_integers("-", &numbers, i64::checked_sub)
}

pub fn prim_mul(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (* 2 3 4) -> 24; (*) -> 1
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    if numbers.is_empty() {
        return Ok(Value::Integer(1));
    }
    fold_integers("*", &numbers, i64::checked_mul)
}

pub fn prim_div(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (/ 20 2 5) -> 2, truncating toward zero
    // (/ 5) -> 5, same pass-through as subtraction
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    let Some((&first, rest)) = numbers.split_first() else {
        return Err(arity_error("/", "at least 1", 0));
    };
    let mut accumulator = first;
    for &number in rest {
        if number == 0 {
            return Err(EvalError::DivisionByZero);
        }
        accumulator = accumulator
            .checked_div(number)
            .ok_or(EvalError::Overflow("/"))?;
    }
    Ok(Value::Integer(accumulator))
}

pub fn prim_max(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    fold_integers("max", &numbers, |accumulator, number| {
        Some(accumulator.max(number))
    })
}

pub fn prim_min(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let numbers = expect_integers(&evaluator.flatten(args)?)?;
    fold_integers("min", &numbers, |accumulator, number| {
        Some(accumulator.min(number))
    })
}

pub fn prim_abs(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let value = single_argument(args, evaluator, "abs")?;
    let number = value
        .as_integer()
        .ok_or_else(|| type_mismatch("an integer", &value))?;
    number
        .checked_abs()
        .map(Value::Integer)
        .ok_or(EvalError::Overflow("abs"))
}

pub fn prim_equals(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    compare_integers(args, evaluator, |left, right| left == right)
}

pub fn prim_greater_than(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    compare_integers(args, evaluator, |left, right| left > right)
}

pub fn prim_less_than(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    compare_integers(args, evaluator, |left, right| left < right)
}

pub fn prim_greater_than_or_equals(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    compare_integers(args, evaluator, |left, right| left >= right)
}

pub fn prim_less_than_or_equals(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    compare_integers(args, evaluator, |left, right| left <= right)
}

// --- Quoting and booleans ---

pub fn prim_quote(args: Option<&Value>, _evaluator: &Evaluator) -> EvalResult {
    // (quote (1 2)) -> (1 2), untouched by evaluation
    match args {
        None => Ok(Value::empty_list()),
        Some(Value::Pair(pair)) => match pair.car.as_deref() {
            Some(value) => Ok(value.clone()),
            None => Ok(Value::empty_list()),
        },
        Some(atom) => Ok(atom.clone()),
    }
}

pub fn prim_is_boolean(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let value = single_argument(args, evaluator, "boolean?")?;
    Ok(Value::boolean(value.is_true() || value.is_false()))
}

pub fn prim_not(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (not #f) -> #t; anything that is not #f negates to #f
    let value = single_argument(args, evaluator, "not")?;
    Ok(Value::boolean(value.is_false()))
}

pub fn prim_and(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (and 1 2 #f 3) -> #f; the last argument decides when nothing is #f
    let Some(mut cursor) = args else {
        return Ok(Value::boolean(true));
    };
    loop {
        match cursor {
            Value::Pair(pair) => {
                if pair.is_empty() {
                    return Ok(Value::boolean(true));
                }
                let value = match pair.car.as_deref() {
                    Some(car) => evaluator.evaluate(car)?,
                    None => Value::empty_list(),
                };
                match pair.cdr.as_deref() {
                    Some(rest) if !rest.is_empty_list() => {
                        if value.is_false() {
                            return Ok(Value::boolean(false));
                        }
                        cursor = rest;
                    }
                    // Last argument: its value is the result, unchecked.
                    _ => return Ok(value),
                }
            }
            atom => return Ok(atom.clone()),
        }
    }
}

pub fn prim_or(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (or #f #f 7) -> 7; only a literal #t short-circuits
    let Some(mut cursor) = args else {
        return Ok(Value::boolean(false));
    };
    loop {
        match cursor {
            Value::Pair(pair) => {
                if pair.is_empty() {
                    return Ok(Value::boolean(false));
                }
                let value = match pair.car.as_deref() {
                    Some(car) => evaluator.evaluate(car)?,
                    None => Value::empty_list(),
                };
                match pair.cdr.as_deref() {
                    Some(rest) if !rest.is_empty_list() => {
                        if value.is_true() {
                            return Ok(Value::boolean(true));
                        }
                        cursor = rest;
                    }
                    _ => return Ok(value),
                }
            }
            atom => return Ok(atom.clone()),
        }
    }
}

// --- List primitives ---

pub fn prim_is_null(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    let value = single_argument(args, evaluator, "null?")?;
    Ok(Value::boolean(value.is_empty_list()))
}

pub fn prim_list(args: Option<&Value>, _evaluator: &Evaluator) -> EvalResult {
    // (list (+ 1 2)) -> ((+ 1 2)); arguments are kept as written
    match args {
        None => Ok(Value::empty_list()),
        Some(value) => Ok(value.clone()),
    }
}

pub fn prim_is_list(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (list? (quote (1 2 3))) -> #t; (list? (cons 1 2)) -> #f
    let value = single_argument(args, evaluator, "list?")?;
    let Value::Pair(pair) = &value else {
        return Ok(Value::boolean(false));
    };
    let mut cursor = pair;
    loop {
        match cursor.cdr.as_deref() {
            None => return Ok(Value::boolean(true)),
            Some(Value::Pair(rest)) => {
                if rest.is_empty() {
                    return Ok(Value::boolean(true));
                }
                cursor = rest;
            }
            Some(_) => return Ok(Value::boolean(false)),
        }
    }
}

pub fn prim_list_ref(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (list-ref (quote (10 20 30)) 1) -> 20
    let (target, index) = list_and_index(args, evaluator, "list-ref")?;
    let elements = evaluator.flatten(Some(&target))?;
    let out_of_range = EvalError::IndexOutOfRange {
        index,
        length: elements.len(),
    };
    let position = usize::try_from(index).map_err(|_| out_of_range.clone())?;
    match elements.get(position) {
        Some(value) => Ok(value.clone()),
        None => Err(out_of_range),
    }
}

pub fn prim_list_tail(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (list-tail (quote (1 2 3)) 1) -> (2 3); an index one past the end
    // lands on the terminator and yields ()
    let (target, index) = list_and_index(args, evaluator, "list-tail")?;
    let steps = usize::try_from(index).map_err(|_| EvalError::IndexOutOfRange {
        index,
        length: spine_length(&target),
    })?;
    let mut cursor = Some(&target);
    for _ in 0..steps {
        match cursor {
            Some(Value::Pair(pair)) if !pair.is_empty() => {
                cursor = pair.cdr.as_deref();
            }
            Some(Value::Pair(_)) | None => {
                return Err(EvalError::IndexOutOfRange {
                    index,
                    length: spine_length(&target),
                });
            }
            Some(other) => return Err(type_mismatch("a pair", other)),
        }
    }
    match cursor {
        None => Ok(Value::empty_list()),
        Some(value) if value.is_empty_list() => Ok(Value::empty_list()),
        Some(value) => Ok(value.clone()),
    }
}

pub fn prim_car(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (car (quote (1 2))) -> 1; a non-pair argument passes through
    let elements = evaluator.flatten(args)?;
    let Some(value) = elements.first() else {
        return Err(arity_error("car", "exactly 1", 0));
    };
    match value {
        Value::Symbol(_) => Err(type_mismatch("a pair", value)),
        Value::Pair(pair) => {
            if pair.is_empty() {
                return Err(type_mismatch("a non-empty pair", value));
            }
            match pair.car.as_deref() {
                Some(car) => Ok(car.clone()),
                None => Ok(Value::empty_list()),
            }
        }
        other => Ok(other.clone()),
    }
}

pub fn prim_cdr(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (cdr (quote (1 2))) -> (2); (cdr (quote (1))) -> ()
    let elements = evaluator.flatten(args)?;
    let Some(value) = elements.first() else {
        return Err(arity_error("cdr", "exactly 1", 0));
    };
    match value {
        Value::Symbol(_) => Err(type_mismatch("a pair", value)),
        Value::Pair(pair) => match pair.cdr.as_deref() {
            Some(cdr) => Ok(cdr.clone()),
            None => Ok(Value::empty_list()),
        },
        _ => Ok(Value::empty_list()),
    }
}

pub fn prim_cons(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // (cons 1 2) -> (1 . 2)
    let elements = evaluator.flatten(args)?;
    match <[Value; 2]>::try_from(elements) {
        Ok([car, cdr]) => Ok(Value::pair(Some(car), Some(cdr))),
        Err(elements) => Err(arity_error("cons", "exactly 2", elements.len())),
    }
}

pub fn prim_is_pair(args: Option<&Value>, evaluator: &Evaluator) -> EvalResult {
    // #t exactly when the argument flattens to two elements, so both
    // (pair? (quote (1 2))) and (pair? (cons 1 2)) hold
    let value = single_argument(args, evaluator, "pair?")?;
    let elements = evaluator.flatten(Some(&value))?;
    Ok(Value::boolean(elements.len() == 2))
}
