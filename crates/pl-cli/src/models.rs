use std::collections::BTreeMap;

use pl_api::SandboxState;
use pl_runtime::RuntimeSnapshot;
use serde::{Deserialize, Serialize};

pub(crate) const PLAYER_STATE_SCHEMA: &str = "player-state.v1";

#[derive(Debug, Clone)]
pub(crate) struct LoadedScenario {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) sources: BTreeMap<String, String>,
    /// Host state a fresh session starts from (`host.json`, then `--var`).
    pub(crate) initial_host: SandboxState,
}

impl LoadedScenario {
    pub(crate) fn with_var_overrides(mut self, vars: Vec<(String, f64)>) -> Self {
        self.initial_host.vars.extend(vars);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerState {
    pub(crate) schema_version: String,
    pub(crate) scenario_id: String,
    pub(crate) snapshot: RuntimeSnapshot,
    pub(crate) host: SandboxState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Choices,
    End,
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    pub(crate) label: Option<String>,
    pub(crate) prompt_text: Option<String>,
    /// Submit index paired with the text shown for it.
    pub(crate) choices: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    RefreshBoundary,
    Quit,
}

pub(crate) struct TuiCommandContext<'a> {
    pub(crate) state_file: &'a str,
    pub(crate) scenario: &'a LoadedScenario,
}
