use std::fmt::Write;

use pl_core::Sexpr;

/// Canonical single-line rendering of one expression.
pub fn print_sexpr(expr: &Sexpr) -> String {
    let mut out = String::new();
    write_sexpr(&mut out, expr);
    out
}

/// One top-level form per line.
pub fn print_program(exprs: &[Sexpr]) -> String {
    exprs.iter().map(print_sexpr).collect::<Vec<_>>().join("\n")
}

fn write_sexpr(out: &mut String, expr: &Sexpr) {
    match expr {
        Sexpr::Number(value) => {
            let _ = write!(out, "{}", value);
        }
        Sexpr::Text(value) => write_string(out, value),
        Sexpr::Symbol(name) => out.push_str(name),
        Sexpr::List(items) => {
            out.push('(');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                write_sexpr(out, item);
            }
            out.push(')');
        }
    }
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}
