use std::sync::OnceLock;

use pl_core::{ErrorKind, ParleyError, Sexpr, SourceSpan};
use regex::Regex;

use crate::lexer::{tokenize, TokenKind};

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("number regex must compile")
    })
}

fn classify_atom(atom: String) -> Sexpr {
    if number_regex().is_match(&atom) {
        if let Ok(value) = atom.parse::<f64>() {
            return Sexpr::Number(value);
        }
    }
    Sexpr::Symbol(atom)
}

/// Reads every top-level expression in `source`.
///
/// The result is purely syntactic: `label`, `choice` and friends are plain
/// symbols at this stage.
pub fn read_source(source: &str) -> Result<Vec<Sexpr>, ParleyError> {
    let tokens = tokenize(source)?;
    let mut top_level = Vec::new();
    // Each open list keeps its items and the span of its `(`.
    let mut stack: Vec<(Vec<Sexpr>, SourceSpan)> = Vec::new();

    for token in tokens {
        let expr = match token.kind {
            TokenKind::Open => {
                stack.push((Vec::new(), token.span));
                continue;
            }
            TokenKind::Close => {
                let Some((items, _)) = stack.pop() else {
                    return Err(ParleyError::with_span(
                        ErrorKind::UnbalancedParentheses,
                        format!(
                            "Unexpected \")\" at {}:{} closes no open list.",
                            token.span.start.line, token.span.start.column
                        ),
                        token.span,
                    ));
                };
                Sexpr::List(items)
            }
            TokenKind::Str(value) => Sexpr::Text(value),
            TokenKind::Atom(atom) => classify_atom(atom),
        };

        match stack.last_mut() {
            Some((items, _)) => items.push(expr),
            None => top_level.push(expr),
        }
    }

    if let Some((_, span)) = stack.pop() {
        return Err(ParleyError::with_span(
            ErrorKind::UnbalancedParentheses,
            format!(
                "List opened at {}:{} is never closed.",
                span.start.line, span.start.column
            ),
            span,
        ));
    }

    Ok(top_level)
}

/// Reads exactly one expression, e.g. a condition typed at a prompt.
pub fn read_one(source: &str) -> Result<Sexpr, ParleyError> {
    let mut exprs = read_source(source)?;
    if exprs.len() != 1 {
        return Err(ParleyError::malformed(format!(
            "Expected exactly one expression, found {}.",
            exprs.len()
        )));
    }
    Ok(exprs.remove(0))
}
