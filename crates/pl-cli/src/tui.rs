use pl_core::ParleyError;

use crate::{LoadedScenario, PlayerSession};

#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(
    state_file: &str,
    scenario: &LoadedScenario,
    session: &mut PlayerSession,
) -> Result<i32, ParleyError> {
    super::run_tui_line_mode(state_file, scenario, session)
}

#[cfg(not(coverage))]
pub(super) fn run_tui_ratatui_mode(
    state_file: &str,
    scenario: &LoadedScenario,
    session: &mut PlayerSession,
) -> Result<i32, ParleyError> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return super::run_tui_line_mode(state_file, scenario, session);
    }
    rich::run(state_file, scenario, session)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use pl_core::ParleyError;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;

    use crate::tui_actions::handle_key;
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;
    use crate::{CliFailure, LoadedScenario, PlayerSession, TuiCommandContext};

    const TYPEWRITER_CHARS_PER_SECOND: usize = 60;
    const TYPEWRITER_TICK_MS: u64 = (1000 / TYPEWRITER_CHARS_PER_SECOND) as u64;

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, ParleyError> {
            enable_raw_mode().map_err(CliFailure::TuiIo.wrap())?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(CliFailure::TuiIo.wrap())?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(CliFailure::TuiIo.wrap())?;
            Ok(Self { terminal })
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run(
        state_file: &str,
        scenario: &LoadedScenario,
        session: &mut PlayerSession,
    ) -> Result<i32, ParleyError> {
        let mut terminal = TuiTerminal::new()?;
        let context = TuiCommandContext {
            state_file,
            scenario,
        };
        let mut ui = TuiUiState {
            status: "ready".to_string(),
            ..TuiUiState::default()
        };
        ui.replace_boundary(session.boundary());
        ui.set_host(&session.host.state());

        let tick = Duration::from_millis(TYPEWRITER_TICK_MS);
        let mut last_tick = Instant::now();

        loop {
            terminal
                .terminal
                .draw(|frame| render_tui(frame, &ui, scenario, state_file))
                .map_err(CliFailure::TuiIo.wrap())?;

            if last_tick.elapsed() >= tick && ui.advance_typewriter() {
                last_tick = Instant::now();
            }

            let timeout = tick.saturating_sub(last_tick.elapsed());
            if !event::poll(timeout).map_err(CliFailure::TuiIo.wrap())? {
                continue;
            }

            let Event::Key(key) = event::read().map_err(CliFailure::TuiIo.wrap())? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(key, &context, session, &mut ui) {
                Ok(true) => break,
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(code = %error.code, "player action failed");
                    ui.status = error.message;
                }
            }
        }

        Ok(0)
    }
}
