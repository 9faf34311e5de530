use std::fmt;

use crate::types::SourceSpan;
use thiserror::Error;

/// Failure classes shared by every stage of the pipeline.
///
/// Reader and compiler kinds are fatal at load time. Evaluator and runtime
/// kinds abort a single turn. `Host` covers collaborators (file loading,
/// player state) that report their own code string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnbalancedParentheses,
    UnterminatedString,
    MalformedGrammar,
    UnknownInitialLabel,
    UndefinedSymbol,
    NotCallable,
    ArityMismatch,
    TypeMismatch,
    UnknownLabel,
    IndexOutOfRange,
    DialogueEnded,
    InvalidSnapshot,
    Host,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnbalancedParentheses => "READER_UNBALANCED_PARENTHESES",
            Self::UnterminatedString => "READER_UNTERMINATED_STRING",
            Self::MalformedGrammar => "COMPILER_MALFORMED_GRAMMAR",
            Self::UnknownInitialLabel => "COMPILER_UNKNOWN_INITIAL_LABEL",
            Self::UndefinedSymbol => "EVAL_UNDEFINED_SYMBOL",
            Self::NotCallable => "EVAL_NOT_CALLABLE",
            Self::ArityMismatch => "EVAL_ARITY_MISMATCH",
            Self::TypeMismatch => "EVAL_TYPE_MISMATCH",
            Self::UnknownLabel => "RUNTIME_UNKNOWN_LABEL",
            Self::IndexOutOfRange => "RUNTIME_INDEX_OUT_OF_RANGE",
            Self::DialogueEnded => "RUNTIME_DIALOGUE_ENDED",
            Self::InvalidSnapshot => "RUNTIME_INVALID_SNAPSHOT",
            Self::Host => "HOST_ERROR",
        }
    }

    pub fn is_load_failure(self) -> bool {
        matches!(
            self,
            Self::UnbalancedParentheses
                | Self::UnterminatedString
                | Self::MalformedGrammar
                | Self::UnknownInitialLabel
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{code}: {message}")]
pub struct ParleyError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl ParleyError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(kind: ErrorKind, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            span: Some(span),
        }
    }

    /// Error raised by a host collaborator with its own code.
    pub fn host(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Host,
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn undefined_symbol(name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedSymbol,
            format!("Symbol \"{}\" is not bound in the environment.", name),
        )
    }

    pub fn type_mismatch(context: &str, expected: &str, found: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("{} expects {}, got {}.", context, expected, found),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedGrammar, message)
    }
}
