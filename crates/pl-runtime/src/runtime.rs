use pl_core::{Choice, Dialogue, ErrorKind, Label, ParleyError};
use serde::{Deserialize, Serialize};

use crate::environment::{Bindings, TurnEnvironment};
use crate::eval::{evaluate_condition, execute_block};
use crate::host::DialogueHost;

pub const CONTINUE_CHOICE_TEXT: &str = "Continue...";
pub const RUNTIME_SNAPSHOT_SCHEMA: &str = "parley-snapshot.v1";

/// How `submit_choice` interprets its index for labels with explicit choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceIndexing {
    /// Position in the label's declared choice list, hidden choices included.
    #[default]
    Declared,
    /// Position in the list the player was shown.
    Visible,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub choice_indexing: ChoiceIndexing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Entered { label: String },
    Ended,
    /// The selected choice's condition was false; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueView {
    pub label: String,
    pub prompt_text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub schema_version: String,
    /// `None` once the dialogue has ended.
    pub current_label: Option<String>,
    #[serde(default)]
    pub choice_indexing: ChoiceIndexing,
}

#[derive(Debug, Clone)]
struct ActiveLabel {
    view: DialogueView,
    /// Declared index behind each visible choice.
    visible_indices: Vec<usize>,
}

#[derive(Debug, Clone)]
enum RuntimeState {
    Active(ActiveLabel),
    Ended,
}

/// Outcome of a turn's evaluation, with the bindings the host absorbs on
/// commit.
enum Transition {
    Enter { target: String, bindings: Bindings },
    End { bindings: Option<Bindings> },
    Stay,
}

#[derive(Debug)]
pub struct DialogueRuntime {
    dialogue: Dialogue,
    options: RuntimeOptions,
    state: RuntimeState,
}

impl DialogueRuntime {
    pub fn start(
        dialogue: Dialogue,
        options: RuntimeOptions,
        host: &mut dyn DialogueHost,
    ) -> Result<Self, ParleyError> {
        let initial = dialogue.initial_label.clone();
        Self::open(dialogue, options, Some(&initial), host)
    }

    pub fn resume(
        dialogue: Dialogue,
        snapshot: &RuntimeSnapshot,
        host: &mut dyn DialogueHost,
    ) -> Result<Self, ParleyError> {
        if snapshot.schema_version != RUNTIME_SNAPSHOT_SCHEMA {
            return Err(ParleyError::new(
                ErrorKind::InvalidSnapshot,
                format!(
                    "Snapshot schema \"{}\" is not supported; expected \"{}\".",
                    snapshot.schema_version, RUNTIME_SNAPSHOT_SCHEMA
                ),
            ));
        }
        if let Some(label) = &snapshot.current_label {
            if dialogue.label(label).is_none() {
                return Err(ParleyError::new(
                    ErrorKind::InvalidSnapshot,
                    format!("Snapshot label \"{}\" is not part of this dialogue.", label),
                ));
            }
        }
        let options = RuntimeOptions {
            choice_indexing: snapshot.choice_indexing,
        };
        Self::open(dialogue, options, snapshot.current_label.as_deref(), host)
    }

    fn open(
        dialogue: Dialogue,
        options: RuntimeOptions,
        label: Option<&str>,
        host: &mut dyn DialogueHost,
    ) -> Result<Self, ParleyError> {
        let mut runtime = Self {
            dialogue,
            options,
            state: RuntimeState::Ended,
        };
        if let Some(label) = label {
            runtime.enter_label(label, host)?;
        }
        Ok(runtime)
    }

    /// Makes `name` the current label. Nothing changes unless every visible
    /// choice condition evaluated successfully.
    pub fn enter_label(&mut self, name: &str, host: &mut dyn DialogueHost) -> Result<(), ParleyError> {
        let active = self.build_active(name, host)?;
        tracing::debug!(label = name, choices = ?active.view.choices, "entered label");
        self.state = RuntimeState::Active(active);
        Ok(())
    }

    /// Re-evaluates the current label's choice conditions against the host.
    pub fn refresh(&mut self, host: &mut dyn DialogueHost) -> Result<(), ParleyError> {
        let name = match &self.state {
            RuntimeState::Active(active) => active.view.label.clone(),
            RuntimeState::Ended => return Err(ended_error()),
        };
        self.enter_label(&name, host)
    }

    pub fn submit_choice(
        &mut self,
        index: usize,
        host: &mut dyn DialogueHost,
    ) -> Result<SubmitOutcome, ParleyError> {
        let RuntimeState::Active(active) = &self.state else {
            return Err(ended_error());
        };
        let label = self.resolve(&active.view.label)?;

        let transition = match &label.choices {
            None => self.run_continue(label, index, host)?,
            Some(choices) => self.run_choice(active, choices, index, host)?,
        };

        match transition {
            Transition::Enter { target, bindings } => {
                let active = self.commit_enter(&target, &bindings, host)?;
                tracing::debug!(label = %target, choices = ?active.view.choices, "entered label");
                self.state = RuntimeState::Active(active);
                Ok(SubmitOutcome::Entered { label: target })
            }
            Transition::End { bindings } => {
                if let Some(bindings) = &bindings {
                    host.absorb_bindings(bindings)?;
                }
                tracing::debug!("dialogue ended");
                self.state = RuntimeState::Ended;
                Ok(SubmitOutcome::Ended)
            }
            Transition::Stay => Ok(SubmitOutcome::Ignored),
        }
    }

    /// Builds the target before the host absorbs anything, then rebuilds it
    /// so the new label sees this turn's effects. The rebuild can only fail
    /// if absorbing changed a binding's type; the staged view is kept then.
    fn commit_enter(
        &self,
        target: &str,
        bindings: &Bindings,
        host: &mut dyn DialogueHost,
    ) -> Result<ActiveLabel, ParleyError> {
        let staged = self.build_active(target, host)?;
        host.absorb_bindings(bindings)?;
        match self.build_active(target, host) {
            Ok(active) => Ok(active),
            Err(error) => {
                tracing::warn!(
                    label = target,
                    code = %error.code,
                    "target label failed after absorb; keeping staged view"
                );
                Ok(staged)
            }
        }
    }

    pub fn snapshot(&self) -> RuntimeSnapshot {
        RuntimeSnapshot {
            schema_version: RUNTIME_SNAPSHOT_SCHEMA.to_string(),
            current_label: self.current_label().map(str::to_string),
            choice_indexing: self.options.choice_indexing,
        }
    }

    pub fn dialogue(&self) -> &Dialogue {
        &self.dialogue
    }

    pub fn options(&self) -> RuntimeOptions {
        self.options
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, RuntimeState::Ended)
    }

    pub fn current_label(&self) -> Option<&str> {
        match &self.state {
            RuntimeState::Active(active) => Some(active.view.label.as_str()),
            RuntimeState::Ended => None,
        }
    }

    pub fn prompt_text(&self) -> Option<&str> {
        match &self.state {
            RuntimeState::Active(active) => Some(active.view.prompt_text.as_str()),
            RuntimeState::Ended => None,
        }
    }

    pub fn choices(&self) -> &[String] {
        match &self.state {
            RuntimeState::Active(active) => &active.view.choices,
            RuntimeState::Ended => &[],
        }
    }

    /// Visible choices paired with the index `submit_choice` expects for each.
    pub fn indexed_choices(&self) -> Vec<(usize, String)> {
        let RuntimeState::Active(active) = &self.state else {
            return Vec::new();
        };
        active
            .view
            .choices
            .iter()
            .enumerate()
            .map(|(position, text)| {
                let index = match self.options.choice_indexing {
                    ChoiceIndexing::Declared => {
                        active.visible_indices.get(position).copied().unwrap_or(position)
                    }
                    ChoiceIndexing::Visible => position,
                };
                (index, text.clone())
            })
            .collect()
    }

    pub fn view(&self) -> Option<DialogueView> {
        match &self.state {
            RuntimeState::Active(active) => Some(active.view.clone()),
            RuntimeState::Ended => None,
        }
    }

    fn resolve(&self, name: &str) -> Result<&Label, ParleyError> {
        self.dialogue.label(name).ok_or_else(|| {
            ParleyError::new(
                ErrorKind::UnknownLabel,
                format!("Label \"{}\" is not declared in this dialogue.", name),
            )
        })
    }

    fn build_active(&self, name: &str, host: &mut dyn DialogueHost) -> Result<ActiveLabel, ParleyError> {
        let label = self.resolve(name)?;

        let (choices, visible_indices) = match &label.choices {
            None => (vec![CONTINUE_CHOICE_TEXT.to_string()], Vec::new()),
            Some(declared) => {
                let mut texts = Vec::new();
                let mut indices = Vec::new();
                for (index, choice) in declared.iter().enumerate() {
                    if choice_allowed(choice, host)?.0 {
                        texts.push(choice.text.clone());
                        indices.push(index);
                    }
                }
                if texts.is_empty() {
                    tracing::warn!(label = name, "every choice condition is false");
                }
                (texts, indices)
            }
        };

        Ok(ActiveLabel {
            view: DialogueView {
                label: label.name.clone(),
                prompt_text: label.text.clone(),
                choices,
            },
            visible_indices,
        })
    }

    fn run_continue(
        &self,
        label: &Label,
        index: usize,
        host: &mut dyn DialogueHost,
    ) -> Result<Transition, ParleyError> {
        if index != 0 {
            return Err(index_error(&label.name, index, 1));
        }
        let Some(after) = &label.after else {
            return Ok(Transition::End { bindings: None });
        };

        let ((), bindings) = with_turn(host, |env| execute_block(&after.code_blocks, env))?;
        Ok(match &after.target_label {
            Some(target) => Transition::Enter {
                target: target.clone(),
                bindings,
            },
            None => Transition::End {
                bindings: Some(bindings),
            },
        })
    }

    fn run_choice(
        &self,
        active: &ActiveLabel,
        choices: &[Choice],
        index: usize,
        host: &mut dyn DialogueHost,
    ) -> Result<Transition, ParleyError> {
        let declared_index = match self.options.choice_indexing {
            ChoiceIndexing::Declared => index,
            ChoiceIndexing::Visible => *active
                .visible_indices
                .get(index)
                .ok_or_else(|| index_error(&active.view.label, index, active.visible_indices.len()))?,
        };
        let Some(choice) = choices.get(declared_index) else {
            return Err(index_error(&active.view.label, index, choices.len()));
        };

        let (allowed, bindings) = choice_allowed(choice, host)?;
        if !allowed {
            tracing::debug!(
                label = %active.view.label,
                choice = %choice.text,
                "choice condition is false; submission ignored"
            );
            return Ok(Transition::Stay);
        }
        Ok(Transition::Enter {
            target: choice.target_label.clone(),
            bindings,
        })
    }
}

/// Runs `turn` against a fresh environment and hands back its final bindings.
fn with_turn<T>(
    host: &mut dyn DialogueHost,
    turn: impl FnOnce(&mut TurnEnvironment<'_>) -> Result<T, ParleyError>,
) -> Result<(T, Bindings), ParleyError> {
    let mut bindings = Bindings::with_builtins();
    host.seed_bindings(&mut bindings)?;
    let mut env = TurnEnvironment::new(bindings, host.host_objects());
    let output = turn(&mut env)?;
    Ok((output, env.into_bindings()))
}

fn choice_allowed(choice: &Choice, host: &mut dyn DialogueHost) -> Result<(bool, Bindings), ParleyError> {
    with_turn(host, |env| match &choice.condition {
        Some(condition) => evaluate_condition(condition, env),
        None => Ok(true),
    })
}

fn index_error(label: &str, index: usize, count: usize) -> ParleyError {
    ParleyError::new(
        ErrorKind::IndexOutOfRange,
        format!(
            "Choice index {} is out of range for label \"{}\" ({} choices).",
            index, label, count
        ),
    )
}

fn ended_error() -> ParleyError {
    ParleyError::new(ErrorKind::DialogueEnded, "The dialogue has already ended.")
}
