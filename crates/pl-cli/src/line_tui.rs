use std::io::{self, BufRead, Write};
use std::path::Path;

use pl_core::{ErrorKind, ParleyError};
use pl_runtime::SubmitOutcome;

use crate::{
    create_session, load_session_for_scenario, save_session, BoundaryEvent, CliFailure,
    LoadedScenario, PlayerSession, TuiCommandAction, TuiCommandContext,
};

pub(crate) const HELP_LINE: &str = "commands: :help :save :load :restart :quit";

pub(crate) fn run_tui_line_mode(
    state_file: &str,
    scenario: &LoadedScenario,
    session: &mut PlayerSession,
) -> Result<i32, ParleyError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(state_file, scenario, session, &mut reader, &mut writer)
}

pub(crate) fn run_tui_line_mode_with_io(
    state_file: &str,
    scenario: &LoadedScenario,
    session: &mut PlayerSession,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, ParleyError> {
    writeln!(writer, "{}", scenario.title).map_err(CliFailure::TuiIo.wrap())?;
    writeln!(writer, "{}", HELP_LINE).map_err(CliFailure::TuiIo.wrap())?;
    let command_context = TuiCommandContext {
        state_file,
        scenario,
    };

    loop {
        let boundary = session.boundary();
        writeln!(writer).map_err(CliFailure::TuiIo.wrap())?;
        if boundary.event == BoundaryEvent::End {
            writeln!(writer, "[END]").map_err(CliFailure::TuiIo.wrap())?;
            return Ok(0);
        }
        if let Some(prompt) = &boundary.prompt_text {
            writeln!(writer, "{}", prompt).map_err(CliFailure::TuiIo.wrap())?;
        }
        for (index, text) in &boundary.choices {
            writeln!(writer, "  [{}] {}", index, text).map_err(CliFailure::TuiIo.wrap())?;
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut lines = Vec::new();
            let action = {
                let mut emit = |line: String| lines.push(line);
                handle_tui_command(raw.trim(), &command_context, session, &mut emit)?
            };
            for line in lines {
                writeln!(writer, "{}", line).map_err(CliFailure::TuiIo.wrap())?;
            }
            match action {
                TuiCommandAction::Continue => continue,
                TuiCommandAction::RefreshBoundary => break,
                TuiCommandAction::Quit => return Ok(0),
                TuiCommandAction::NotHandled => {}
            }

            let Ok(choice) = raw.trim().parse::<usize>() else {
                writeln!(writer, "not a choice: {}", raw)
                    .map_err(CliFailure::TuiIo.wrap())?;
                continue;
            };
            match session.submit(choice) {
                Ok(SubmitOutcome::Ignored) => {
                    writeln!(writer, "that choice is not available")
                        .map_err(CliFailure::TuiIo.wrap())?;
                }
                Ok(_) => break,
                Err(error) if error.kind == ErrorKind::IndexOutOfRange => {
                    writeln!(writer, "{}", error.message).map_err(CliFailure::TuiIo.wrap())?;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Shared `:command` handling for the line and full-screen players.
pub(crate) fn handle_tui_command(
    raw: &str,
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, ParleyError> {
    match raw {
        ":help" => {
            emit(HELP_LINE.to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":save" => {
            save_session(Path::new(context.state_file), session)?;
            emit(format!("saved: {}", context.state_file));
            Ok(TuiCommandAction::Continue)
        }
        ":load" => {
            *session = load_session_for_scenario(Path::new(context.state_file), context.scenario)?;
            emit(format!("loaded: {}", context.state_file));
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":restart" => {
            *session = create_session(context.scenario, session.runtime.options())?;
            emit("restarted".to_string());
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

/// Reads one line; `None` once the input is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, ParleyError> {
    write!(writer, "{}", prefix).map_err(CliFailure::TuiIo.wrap())?;
    writer.flush().map_err(CliFailure::TuiIo.wrap())?;
    let mut input = String::new();
    if reader.read_line(&mut input).map_err(CliFailure::TuiIo.wrap())? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
