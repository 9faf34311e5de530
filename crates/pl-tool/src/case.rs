use std::collections::BTreeMap;

use pl_api::PawnPosition;
use pl_runtime::ChoiceIndexing;
use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "pl-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    /// Overrides for the variables in `host.json`.
    #[serde(default)]
    pub vars: BTreeMap<String, f64>,
    #[serde(default)]
    pub choice_indexing: ChoiceIndexing,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
    /// Checked once the actions are replayed.
    #[serde(default)]
    pub expected_vars: BTreeMap<String, f64>,
    #[serde(default)]
    pub expected_pawn: Option<PawnPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Prompt { text: String, choices: Vec<String> },
    /// The submitted choice was hidden and nothing happened.
    Ignored,
    End,
}
