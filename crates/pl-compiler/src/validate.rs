use pl_core::{Diagnostic, DiagnosticKind, Dialogue, ErrorKind, ParleyError};

/// Strict pass: every target must name a declared label.
///
/// Targets are normally resolved lazily at transition time, which allows a
/// dangling name to sit unnoticed until someone walks that edge.
pub fn resolve_all_targets(dialogue: &Dialogue) -> Result<(), ParleyError> {
    for label in dialogue.labels.values() {
        for target in label.targets() {
            if !dialogue.labels.contains_key(target) {
                return Err(ParleyError::new(
                    ErrorKind::UnknownLabel,
                    format!(
                        "Label \"{}\" targets \"{}\", which is not a declared label.",
                        label.name, target
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Non-fatal authoring hazards, in label name order.
pub fn collect_diagnostics(dialogue: &Dialogue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for label in dialogue.labels.values() {
        if label.choices.is_some() && label.after.is_some() {
            diagnostics.push(Diagnostic {
                label: label.name.clone(),
                kind: DiagnosticKind::UnreachableAfter,
                message: format!(
                    "Label \"{}\" declares choices and an after block; the after block never runs.",
                    label.name
                ),
            });
        }

        for target in label.targets() {
            if !dialogue.labels.contains_key(target) {
                diagnostics.push(Diagnostic {
                    label: label.name.clone(),
                    kind: DiagnosticKind::DanglingTarget {
                        target: target.to_string(),
                    },
                    message: format!(
                        "Label \"{}\" targets undeclared label \"{}\".",
                        label.name, target
                    ),
                });
            }
        }
    }

    diagnostics
}
