use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pl_core::{ErrorKind, ParleyError};
use pl_runtime::SubmitOutcome;

use crate::line_tui::handle_tui_command;
use crate::tui_state::TuiUiState;
use crate::{PlayerSession, TuiCommandAction, TuiCommandContext};

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

/// Applies one key press; `Ok(true)` asks the player loop to exit.
pub(crate) fn handle_key(
    key: KeyEvent,
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    ui: &mut TuiUiState,
) -> Result<bool, ParleyError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    let command = match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
            return Ok(false);
        }
        KeyCode::Char('r') => Some(":restart"),
        KeyCode::Char('s') => Some(":save"),
        KeyCode::Char('l') => Some(":load"),
        _ => None,
    };
    if let Some(command) = command {
        let mut status = String::new();
        let action = handle_tui_command(command, context, session, &mut |line: String| {
            status = line
        })?;
        ui.status = status;
        match action {
            TuiCommandAction::RefreshBoundary if command == ":restart" => {
                ui.replace_boundary(session.boundary());
            }
            TuiCommandAction::RefreshBoundary => ui.append_boundary(session.boundary()),
            _ => {}
        }
        ui.set_host(&session.host.state());
        return Ok(false);
    }

    let typing_in_progress = ui.typing_in_progress();
    match key.code {
        KeyCode::Up => {
            if let Some(status) = blocked_status(ui, typing_in_progress) {
                ui.status = status.to_string();
                return Ok(false);
            }
            ui.selected_choice_index = ui.selected_choice_index.saturating_sub(1);
            if ui.selected_choice_index < ui.choice_scroll_offset {
                ui.choice_scroll_offset = ui.selected_choice_index;
            }
        }
        KeyCode::Down => {
            if let Some(status) = blocked_status(ui, typing_in_progress) {
                ui.status = status.to_string();
                return Ok(false);
            }
            let last = ui.choices.len().saturating_sub(1);
            ui.selected_choice_index = (ui.selected_choice_index + 1).min(last);
            if ui.choices.len() > CHOICE_VIEWPORT_ROWS
                && ui.selected_choice_index >= ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS
            {
                ui.choice_scroll_offset = ui.selected_choice_index - CHOICE_VIEWPORT_ROWS + 1;
            }
        }
        KeyCode::Enter => {
            if typing_in_progress {
                ui.finish_typing();
                return Ok(false);
            }
            if let Some(status) = blocked_status(ui, typing_in_progress) {
                ui.status = status.to_string();
                return Ok(false);
            }
            let selected = ui.choices.get(ui.selected_choice_index).ok_or_else(|| {
                ParleyError::host("TUI_CHOICE_PARSE", "No choices available")
            })?;
            let (index, text) = (selected.index, selected.text.clone());
            match session.submit(index) {
                Ok(SubmitOutcome::Ignored) => {
                    ui.status = format!("\"{}\" is not available", text);
                }
                Ok(_) => {
                    ui.append_boundary(session.boundary());
                    ui.set_host(&session.host.state());
                    ui.status = format!("chose {}", text);
                }
                Err(error) if error.kind == ErrorKind::IndexOutOfRange => {
                    ui.status = error.message;
                }
                Err(error) => return Err(error),
            }
        }
        _ => {}
    }

    Ok(false)
}

fn blocked_status(ui: &TuiUiState, typing_in_progress: bool) -> Option<&'static str> {
    if typing_in_progress {
        Some("text streaming...")
    } else if ui.ended {
        Some("the dialogue has ended")
    } else if ui.choices.is_empty() {
        Some("no pending choice")
    } else {
        None
    }
}
