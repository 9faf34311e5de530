use pl_core::{ErrorKind, ParleyError, Sexpr, Value};

use crate::environment::Environment;

/// The only special form: `(set* <symbol> <expr>)`.
pub const SET_FORM: &str = "set*";

pub fn evaluate(expr: &Sexpr, env: &mut dyn Environment) -> Result<Value, ParleyError> {
    match expr {
        Sexpr::Number(value) => Ok(Value::Number(*value)),
        Sexpr::Text(value) => Ok(Value::Text(value.clone())),
        Sexpr::Symbol(name) => env.lookup(name),
        Sexpr::List(items) => evaluate_list(items, env),
    }
}

/// Conditions must produce a Number; only values above zero are true.
pub fn evaluate_condition(expr: &Sexpr, env: &mut dyn Environment) -> Result<bool, ParleyError> {
    let value = evaluate(expr, env)?;
    let number = value.expect_number("Condition")?;
    Ok(number > 0.0)
}

pub fn execute_block(exprs: &[Sexpr], env: &mut dyn Environment) -> Result<(), ParleyError> {
    for expr in exprs {
        evaluate(expr, env)?;
    }
    Ok(())
}

fn evaluate_list(items: &[Sexpr], env: &mut dyn Environment) -> Result<Value, ParleyError> {
    let Some((head, args)) = items.split_first() else {
        return Err(ParleyError::new(
            ErrorKind::NotCallable,
            "Cannot evaluate an empty list \"()\".",
        ));
    };

    if head.as_symbol() == Some(SET_FORM) {
        return evaluate_set(args, env);
    }

    let function = match evaluate(head, env)? {
        Value::NativeFunction(function) => function,
        other => {
            let callee = head.as_symbol().unwrap_or(head.kind_name());
            return Err(ParleyError::new(
                ErrorKind::NotCallable,
                format!("\"{}\" is a {}, not a function.", callee, other.type_name()),
            ));
        }
    };
    if !function.arity.accepts(args.len()) {
        return Err(ParleyError::new(
            ErrorKind::ArityMismatch,
            format!(
                "Function \"{}\" expects {}, got {}.",
                function.name,
                function.arity.describe(),
                args.len()
            ),
        ));
    }

    let values = args
        .iter()
        .map(|arg| evaluate(arg, env))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(function = function.name, args = values.len(), "native call");
    function.call(env.host_objects(), &values)
}

fn evaluate_set(args: &[Sexpr], env: &mut dyn Environment) -> Result<Value, ParleyError> {
    let [target, expr] = args else {
        return Err(ParleyError::new(
            ErrorKind::ArityMismatch,
            format!("set* expects 2 arguments, got {}.", args.len()),
        ));
    };
    let Some(name) = target.as_symbol() else {
        return Err(ParleyError::type_mismatch(
            "set*",
            "a symbol to assign",
            target.kind_name(),
        ));
    };

    let value = evaluate(expr, env)?;
    env.assign(name, value.clone())?;
    Ok(value)
}
