use std::collections::BTreeMap;

use pl_core::{Diagnostic, Dialogue, ErrorKind, Label, ParleyError, Sexpr};
use pl_reader::{print_sexpr, read_source};

mod form;
mod validate;

pub use validate::{collect_diagnostics, resolve_all_targets};

pub const FORM_LABEL: &str = "label";
pub const FORM_TEXT: &str = "text";
pub const FORM_CHOICE: &str = "choice";
pub const FORM_AFTER: &str = "after";
pub const FORM_BODY: &str = "body";
pub const FORM_START: &str = "start-dialogue";
pub const KEYWORD_JUMP: &str = "jump";
pub const KEYWORD_COND: &str = "cond";
pub const SPECIAL_SET: &str = "set*";

/// Words owned by the dialogue grammar; they never name a callable.
pub const GRAMMAR_KEYWORDS: [&str; 8] = [
    FORM_LABEL,
    FORM_TEXT,
    FORM_CHOICE,
    FORM_AFTER,
    FORM_BODY,
    FORM_START,
    KEYWORD_JUMP,
    KEYWORD_COND,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject any jump or choice target that names no declared label.
    pub strict_targets: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    pub dialogue: Dialogue,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn compile_dialogue(exprs: &[Sexpr]) -> Result<Dialogue, ParleyError> {
    compile_dialogue_with_options(exprs, CompileOptions::default()).map(|result| result.dialogue)
}

pub fn compile_source(source: &str, options: CompileOptions) -> Result<CompileResult, ParleyError> {
    let exprs = read_source(source)?;
    compile_dialogue_with_options(&exprs, options)
}

pub fn compile_dialogue_with_options(
    exprs: &[Sexpr],
    options: CompileOptions,
) -> Result<CompileResult, ParleyError> {
    let mut labels: BTreeMap<String, Label> = BTreeMap::new();
    let mut initial_label: Option<String> = None;

    for expr in exprs {
        let Some(items) = expr.as_list() else {
            return Err(ParleyError::malformed(format!(
                "Top-level {} \"{}\" is not a form; expected (label ...) or (start-dialogue ...).",
                expr.kind_name(),
                print_sexpr(expr)
            )));
        };

        match expr.head_symbol() {
            Some(FORM_LABEL) => {
                let label = form::compile_label(items)?;
                if labels.contains_key(&label.name) {
                    return Err(ParleyError::malformed(format!(
                        "Label \"{}\" is declared more than once.",
                        label.name
                    )));
                }
                labels.insert(label.name.clone(), label);
            }
            Some(FORM_START) => {
                let name = form::compile_start(items)?;
                if let Some(previous) = &initial_label {
                    return Err(ParleyError::malformed(format!(
                        "start-dialogue is declared twice (\"{}\" and \"{}\").",
                        previous, name
                    )));
                }
                initial_label = Some(name);
            }
            _ => {
                return Err(ParleyError::malformed(format!(
                    "Unexpected top-level form \"{}\"; expected (label ...) or (start-dialogue ...).",
                    print_sexpr(expr)
                )))
            }
        }
    }

    let Some(initial_label) = initial_label else {
        return Err(ParleyError::malformed(
            "Dialogue has no (start-dialogue <label>) form.",
        ));
    };
    if !labels.contains_key(&initial_label) {
        return Err(ParleyError::new(
            ErrorKind::UnknownInitialLabel,
            format!(
                "start-dialogue names \"{}\", which is not a declared label.",
                initial_label
            ),
        ));
    }

    let dialogue = Dialogue {
        initial_label,
        labels,
    };

    if options.strict_targets {
        resolve_all_targets(&dialogue)?;
    }

    let diagnostics = collect_diagnostics(&dialogue);
    for diagnostic in &diagnostics {
        tracing::warn!(label = %diagnostic.label, "{}", diagnostic.message);
    }
    tracing::debug!(
        labels = dialogue.labels.len(),
        initial = %dialogue.initial_label,
        strict = options.strict_targets,
        "dialogue compiled"
    );

    Ok(CompileResult {
        dialogue,
        diagnostics,
    })
}
