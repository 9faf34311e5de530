use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 1 },
            end: SourceLocation { line: 1, column: 1 },
        }
    }

    pub fn point(location: SourceLocation) -> Self {
        Self {
            start: location.clone(),
            end: location,
        }
    }
}

/// Purely syntactic unit produced by the reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Sexpr {
    Number(f64),
    Text(String),
    Symbol(String),
    List(Vec<Sexpr>),
}

impl Sexpr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Head symbol of a list form, e.g. `label` for `(label intro ...)`.
    pub fn head_symbol(&self) -> Option<&str> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(Sexpr::as_symbol)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::List(_) => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,
    pub target_label: String,
    pub condition: Option<Sexpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterLabel {
    pub code_blocks: Vec<Sexpr>,
    pub target_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    pub text: String,
    /// `None` means the label declared no `choice` forms at all.
    pub choices: Option<Vec<Choice>>,
    pub after: Option<AfterLabel>,
}

impl Label {
    pub fn has_explicit_choices(&self) -> bool {
        self.choices.is_some()
    }

    /// Every label name this label can transition to, in declaration order.
    pub fn targets(&self) -> Vec<&str> {
        let mut targets = Vec::new();
        if let Some(choices) = &self.choices {
            targets.extend(choices.iter().map(|choice| choice.target_label.as_str()));
        }
        if let Some(target) = self
            .after
            .as_ref()
            .and_then(|after| after.target_label.as_deref())
        {
            targets.push(target);
        }
        targets
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    pub initial_label: String,
    pub labels: BTreeMap<String, Label>,
}

impl Dialogue {
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// Label declares both choices and an after block; the after block never runs.
    UnreachableAfter,
    /// A jump or choice target names no declared label.
    DanglingTarget { target: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub label: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub message: String,
}
