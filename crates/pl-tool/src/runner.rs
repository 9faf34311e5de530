use std::path::Path;

use pl_api::{
    create_runtime_from_source, CreateRuntimeOptions, PawnPosition, SandboxHost, SandboxState,
};
use pl_runtime::{DialogueRuntime, RuntimeOptions, SubmitOutcome};

use crate::source::{read_host_state, read_scripts_from_dir, read_test_case};
use crate::{ExpectedEvent, PlToolError, TestAction, TestCase};

const MAX_STEPS: usize = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    /// Sandbox state after the last replayed action.
    pub host: SandboxState,
}

/// Replays `case.actions` from the initial label. The run stops at the end of
/// the dialogue, or at the first prompt after the last action.
pub fn run_case(scripts_dir: &Path, case: &TestCase) -> Result<RunReport, PlToolError> {
    let sources = read_scripts_from_dir(scripts_dir)?;
    let mut initial = read_host_state(scripts_dir)?;
    initial.vars.extend(case.vars.clone());
    let mut host = SandboxHost::new(initial);

    let mut runtime = create_runtime_from_source(
        CreateRuntimeOptions {
            sources,
            runtime: RuntimeOptions {
                choice_indexing: case.choice_indexing,
            },
            ..CreateRuntimeOptions::default()
        },
        &mut host,
    )?;

    let mut observed_events = Vec::new();
    let mut actions = case.actions.iter();
    let mut consumed_actions = 0usize;

    for _ in 0..MAX_STEPS {
        if runtime.is_ended() {
            observed_events.push(ExpectedEvent::End);
            if consumed_actions != case.actions.len() {
                return Err(PlToolError::UnusedActions {
                    used: consumed_actions,
                    total: case.actions.len(),
                });
            }
            return Ok(finish(observed_events, consumed_actions, host));
        }

        observed_events.push(prompt_event(&runtime));
        let Some(TestAction::Choose { index }) = actions.next() else {
            return Ok(finish(observed_events, consumed_actions, host));
        };
        consumed_actions += 1;

        if runtime.submit_choice(*index, &mut host)? == SubmitOutcome::Ignored {
            tracing::debug!(index, "choice ignored");
            observed_events.push(ExpectedEvent::Ignored);
        }
    }

    Err(PlToolError::GuardExceeded {
        max_steps: MAX_STEPS,
    })
}

pub fn assert_case(scripts_dir: &Path, case_path: &Path) -> Result<(), PlToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(scripts_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(PlToolError::EventSerialize)?;
        return Err(PlToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(PlToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(PlToolError::EventSerialize)?;
            return Err(PlToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    for (name, expected) in &case.expected_vars {
        let actual = report.host.vars.get(name).copied();
        if actual != Some(*expected) {
            return Err(PlToolError::VarMismatch {
                name: name.clone(),
                expected: *expected,
                actual,
            });
        }
    }

    if let Some(expected) = case.expected_pawn {
        let actual = report.host.pawn;
        if actual != expected {
            return Err(PlToolError::PawnMismatch {
                expected: describe_pawn(expected),
                actual: describe_pawn(actual),
            });
        }
    }

    Ok(())
}

fn prompt_event(runtime: &DialogueRuntime) -> ExpectedEvent {
    ExpectedEvent::Prompt {
        text: runtime.prompt_text().unwrap_or_default().to_string(),
        choices: runtime.choices().to_vec(),
    }
}

fn finish(
    observed_events: Vec<ExpectedEvent>,
    consumed_actions: usize,
    host: SandboxHost,
) -> RunReport {
    RunReport {
        observed_events,
        consumed_actions,
        host: host.state(),
    }
}

fn describe_pawn(pawn: PawnPosition) -> String {
    format!("({}, {}, {})", pawn.x, pawn.y, pawn.z)
}
