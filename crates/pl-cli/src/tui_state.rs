use pl_api::SandboxState;

use crate::{BoundaryEvent, BoundaryResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChoiceRow {
    /// Index handed to `submit_choice`.
    pub(crate) index: usize,
    pub(crate) text: String,
}

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    /// Prompts already typed out, oldest first.
    pub(crate) rendered_lines: Vec<String>,
    pub(crate) pending_lines: Vec<String>,
    pub(crate) typing_line: Option<String>,
    pub(crate) typing_chars: usize,
    pub(crate) choices: Vec<ChoiceRow>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) ended: bool,
    pub(crate) help_visible: bool,
    pub(crate) host_summary: String,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn typing_in_progress(&self) -> bool {
        self.typing_line.is_some() || !self.pending_lines.is_empty()
    }

    fn set_boundary_state(&mut self, boundary: BoundaryResult) {
        self.selected_choice_index = 0;
        self.choice_scroll_offset = 0;
        match boundary.event {
            BoundaryEvent::Choices => {
                self.choices = boundary
                    .choices
                    .into_iter()
                    .map(|(index, text)| ChoiceRow { index, text })
                    .collect();
                self.ended = false;
            }
            BoundaryEvent::End => {
                self.choices.clear();
                self.ended = true;
            }
        }
    }

    /// Queues the boundary's prompt after the existing transcript.
    pub(crate) fn append_boundary(&mut self, boundary: BoundaryResult) {
        self.pending_lines.extend(boundary_lines(&boundary));
        self.set_boundary_state(boundary);
    }

    /// Starts a fresh transcript from the boundary.
    pub(crate) fn replace_boundary(&mut self, boundary: BoundaryResult) {
        self.rendered_lines.clear();
        self.pending_lines = boundary_lines(&boundary);
        self.typing_line = None;
        self.typing_chars = 0;
        self.set_boundary_state(boundary);
    }

    pub(crate) fn set_host(&mut self, host: &SandboxState) {
        let vars = host
            .vars
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        self.host_summary = format!(
            "pawn ({}, {}, {}) {}",
            host.pawn.x, host.pawn.y, host.pawn.z, vars
        )
        .trim_end()
        .to_string();
    }

    /// Types one more character; false once nothing is left to type.
    pub(crate) fn advance_typewriter(&mut self) -> bool {
        if self.typing_line.is_none() {
            if self.pending_lines.is_empty() {
                return false;
            }
            let next_line = self.pending_lines.remove(0);
            if next_line.is_empty() {
                self.rendered_lines.push(next_line);
            } else {
                self.typing_line = Some(next_line);
                self.typing_chars = 1;
            }
            return true;
        }

        let Some(line) = self.typing_line.as_ref() else {
            return false;
        };
        if self.typing_chars >= line.chars().count() {
            self.rendered_lines.push(line.clone());
            self.typing_line = None;
            self.typing_chars = 0;
            return true;
        }
        self.typing_chars += 1;
        true
    }

    pub(crate) fn finish_typing(&mut self) {
        while self.advance_typewriter() {}
    }
}

fn boundary_lines(boundary: &BoundaryResult) -> Vec<String> {
    match (&boundary.event, &boundary.prompt_text) {
        (BoundaryEvent::End, _) => vec![String::new(), "[END]".to_string()],
        (BoundaryEvent::Choices, Some(prompt)) => vec![String::new(), prompt.clone()],
        (BoundaryEvent::Choices, None) => Vec::new(),
    }
}
