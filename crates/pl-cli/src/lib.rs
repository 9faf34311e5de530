use std::ffi::OsString;
use std::sync::Once;

use clap::Parser;
use pl_core::ParleyError;
use pl_runtime::RuntimeOptions;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod agent;
mod boundary_runner;
mod check;
mod cli_args;
mod error_map;
mod line_tui;
mod models;
mod session_ops;
mod source_loader;
mod state_store;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use boundary_runner::{boundary_of, emit_boundary};
pub(crate) use cli_args::{
    AgentArgs, AgentCommand, CheckArgs, ChooseArgs, Cli, DumpArgs, Mode, StartArgs, TuiArgs,
};
pub(crate) use error_map::{emit_error, CliFailure};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use models::{
    BoundaryEvent, BoundaryResult, LoadedScenario, PlayerState, TuiCommandAction,
    TuiCommandContext, PLAYER_STATE_SCHEMA,
};
pub(crate) use session_ops::{
    create_session, emit_boundary_with_saved_state, load_session_for_ref,
    load_session_for_scenario, save_session, PlayerSession,
};
pub(crate) use source_loader::{load_source_by_ref, load_source_by_scripts_dir, parse_var};
pub(crate) use state_store::{load_player_state, save_player_state};

const LOG_ENV: &str = "PARLEY_LOG";
const DEFAULT_STATE_FILE: &str = ".parley/save.json";

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber when `PARLEY_LOG` (or `RUST_LOG`) is set.
/// stdout carries the agent protocol and must stay clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .and_then(|directives| EnvFilter::try_new(directives).ok());
        let Some(filter) = filter else {
            return;
        };
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .try_init();
    });
}

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_tracing();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, ParleyError> {
    match cli.command {
        Mode::Agent(args) => agent::run_agent(args),
        Mode::Tui(args) => run_tui(args),
        Mode::Check(args) => check::run_check(args),
        Mode::Dump(args) => check::run_dump(args),
    }
}

fn run_tui(args: TuiArgs) -> Result<i32, ParleyError> {
    let state_file = args
        .state_file
        .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?;
    let overrides = args
        .var
        .iter()
        .map(|raw| parse_var(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let scenario = scenario.with_var_overrides(overrides);
    let mut session = create_session(&scenario, RuntimeOptions::default())?;

    if args.line {
        return run_tui_line_mode(&state_file, &scenario, &mut session);
    }
    tui::run_tui_ratatui_mode(&state_file, &scenario, &mut session)
}

#[cfg(test)]
mod cli_test_support;
