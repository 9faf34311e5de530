//! Replays scripted choices against a scripts directory and compares what
//! the player would have seen with a recorded expectation.

mod case;
mod runner;
mod source;

pub use case::{ExpectedEvent, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport};
pub use source::{read_host_state, read_scripts_from_dir, read_test_case};

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can make a replayed case fail, from unreadable files to
/// a diverging transcript.
#[derive(Debug, Error)]
pub enum PlToolError {
    #[error("cannot read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("testcase {} is not valid JSON: {source}", .path.display())]
    ParseCase {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("host state {} is not valid JSON: {source}", .path.display())]
    ParseHost {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("testcase schema is \"{found}\" but this runner reads \"{expected}\"")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("no .dlg scripts found under {}", .path.display())]
    SourceEmpty { path: PathBuf },
    #[error(transparent)]
    Dialogue(#[from] pl_core::ParleyError),
    #[error("dialogue ended after {used} of {total} actions")]
    UnusedActions { used: usize, total: usize },
    #[error("replay did not settle within {max_steps} steps")]
    GuardExceeded { max_steps: usize },
    #[error("expected {expected} events, saw {actual}; transcript: {observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("event #{index} differs: wanted {expected}, saw {actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("variable \"{name}\" should be {expected}, found {actual:?}")]
    VarMismatch {
        name: String,
        expected: f64,
        actual: Option<f64>,
    },
    #[error("pawn should be at {expected}, found {actual}")]
    PawnMismatch { expected: String, actual: String },
    #[error("cannot render events as JSON: {0}")]
    EventSerialize(#[source] serde_json::Error),
}
