use pl_core::{Arity, ErrorKind, HostObjects, ParleyError, Value};

use crate::environment::Bindings;

/// Binds the default arithmetic, comparison and logic natives.
pub fn register_builtins(bindings: &mut Bindings) {
    bindings.register_native("+", Arity::AtLeast(0), add);
    bindings.register_native("-", Arity::AtLeast(1), subtract);
    bindings.register_native("*", Arity::AtLeast(0), multiply);
    bindings.register_native("/", Arity::AtLeast(2), divide);
    bindings.register_native("cmp", Arity::Exact(2), cmp);
    bindings.register_native("<", Arity::Exact(2), less);
    bindings.register_native(">", Arity::Exact(2), greater);
    bindings.register_native("<=", Arity::Exact(2), less_equal);
    bindings.register_native(">=", Arity::Exact(2), greater_equal);
    bindings.register_native("=", Arity::Exact(2), equal);
    bindings.register_native("not", Arity::Exact(1), not);
    bindings.register_native("and", Arity::AtLeast(1), and);
    bindings.register_native("or", Arity::AtLeast(1), or);
}

fn numbers(name: &str, args: &[Value]) -> Result<Vec<f64>, ParleyError> {
    args.iter()
        .map(|value| value.expect_number(&format!("\"{}\"", name)))
        .collect()
}

fn pair(name: &str, args: &[Value]) -> Result<(f64, f64), ParleyError> {
    match numbers(name, args)?.as_slice() {
        [left, right] => Ok((*left, *right)),
        other => Err(ParleyError::new(
            ErrorKind::ArityMismatch,
            format!("Function \"{}\" expects 2 arguments, got {}.", name, other.len()),
        )),
    }
}

fn add(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    Ok(Value::Number(numbers("+", args)?.iter().sum()))
}

fn subtract(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let values = numbers("-", args)?;
    let result = match values.split_first() {
        Some((only, [])) => -only,
        Some((first, rest)) => rest.iter().fold(*first, |acc, value| acc - value),
        None => 0.0,
    };
    Ok(Value::Number(result))
}

fn multiply(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    Ok(Value::Number(numbers("*", args)?.iter().product()))
}

/// IEEE division: dividing by zero yields an infinity or NaN, not an error.
fn divide(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let values = numbers("/", args)?;
    let result = match values.split_first() {
        Some((first, rest)) => rest.iter().fold(*first, |acc, value| acc / value),
        None => 0.0,
    };
    Ok(Value::Number(result))
}

fn cmp(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair("cmp", args)?;
    Ok(Value::from_bool(left >= right))
}

fn less(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair("<", args)?;
    Ok(Value::from_bool(left < right))
}

fn greater(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair(">", args)?;
    Ok(Value::from_bool(left > right))
}

fn less_equal(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair("<=", args)?;
    Ok(Value::from_bool(left <= right))
}

fn greater_equal(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair(">=", args)?;
    Ok(Value::from_bool(left >= right))
}

fn equal(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let (left, right) = pair("=", args)?;
    Ok(Value::from_bool(left == right))
}

fn not(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let values = numbers("not", args)?;
    Ok(Value::from_bool(!values.iter().any(|value| *value > 0.0)))
}

fn and(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let values = numbers("and", args)?;
    Ok(Value::from_bool(values.iter().all(|value| *value > 0.0)))
}

fn or(_objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let values = numbers("or", args)?;
    Ok(Value::from_bool(values.iter().any(|value| *value > 0.0)))
}
