use std::path::Path;

use pl_api::{
    create_runtime_from_source, resume_runtime_from_source, CreateRuntimeOptions,
    ResumeRuntimeOptions, SandboxHost,
};
use pl_core::ParleyError;
use pl_runtime::{DialogueRuntime, RuntimeOptions, SubmitOutcome};

use crate::{
    boundary_of, emit_boundary, load_player_state, load_source_by_ref, save_player_state,
    BoundaryEvent, BoundaryResult, LoadedScenario, PlayerState, PLAYER_STATE_SCHEMA,
};

/// A running dialogue together with the sandbox it plays against.
#[derive(Debug)]
pub(crate) struct PlayerSession {
    pub(crate) scenario_id: String,
    pub(crate) runtime: DialogueRuntime,
    pub(crate) host: SandboxHost,
}

impl PlayerSession {
    pub(crate) fn submit(&mut self, index: usize) -> Result<SubmitOutcome, ParleyError> {
        let outcome = self.runtime.submit_choice(index, &mut self.host)?;
        tracing::debug!(index, ?outcome, "choice submitted");
        Ok(outcome)
    }

    pub(crate) fn boundary(&self) -> BoundaryResult {
        boundary_of(&self.runtime)
    }

    pub(crate) fn player_state(&self) -> PlayerState {
        PlayerState {
            schema_version: PLAYER_STATE_SCHEMA.to_string(),
            scenario_id: self.scenario_id.clone(),
            snapshot: self.runtime.snapshot(),
            host: self.host.state(),
        }
    }
}

pub(crate) fn create_session(
    scenario: &LoadedScenario,
    options: RuntimeOptions,
) -> Result<PlayerSession, ParleyError> {
    let mut host = SandboxHost::new(scenario.initial_host.clone());
    let runtime = create_runtime_from_source(
        CreateRuntimeOptions {
            sources: scenario.sources.clone(),
            runtime: options,
            ..CreateRuntimeOptions::default()
        },
        &mut host,
    )?;
    Ok(PlayerSession {
        scenario_id: scenario.id.clone(),
        runtime,
        host,
    })
}

pub(crate) fn resume_session(
    scenario: &LoadedScenario,
    state: &PlayerState,
) -> Result<PlayerSession, ParleyError> {
    let mut host = SandboxHost::new(state.host.clone());
    let runtime = resume_runtime_from_source(
        ResumeRuntimeOptions {
            sources: scenario.sources.clone(),
            snapshot: state.snapshot.clone(),
        },
        &mut host,
    )?;
    Ok(PlayerSession {
        scenario_id: state.scenario_id.clone(),
        runtime,
        host,
    })
}

pub(crate) fn save_session(path: &Path, session: &PlayerSession) -> Result<(), ParleyError> {
    save_player_state(path, &session.player_state())
}

pub(crate) fn load_session_for_ref(
    path: &Path,
) -> Result<(LoadedScenario, PlayerSession), ParleyError> {
    let state = load_player_state(path)?;
    let scenario = load_source_by_ref(&state.scenario_id)?;
    let session = resume_session(&scenario, &state)?;
    Ok((scenario, session))
}

pub(crate) fn load_session_for_scenario(
    path: &Path,
    scenario: &LoadedScenario,
) -> Result<PlayerSession, ParleyError> {
    let state = load_player_state(path)?;
    if state.scenario_id != scenario.id {
        return Err(ParleyError::host(
            "TUI_STATE_SCENARIO_MISMATCH",
            format!(
                "State scenario mismatch. expected={} actual={}",
                scenario.id, state.scenario_id
            ),
        ));
    }
    resume_session(scenario, &state)
}

/// Saves the session when the player still has something to choose and
/// prints the boundary.
pub(crate) fn emit_boundary_with_saved_state(
    session: &PlayerSession,
    state_out: &str,
) -> Result<i32, ParleyError> {
    let boundary = session.boundary();
    let host = session.host.state();
    if boundary.event == BoundaryEvent::Choices {
        save_session(Path::new(state_out), session)?;
        emit_boundary(boundary, Some(&host), Some(state_out.to_string()));
        return Ok(0);
    }

    emit_boundary(boundary, Some(&host), None);
    Ok(0)
}
