use std::path::Path;

use pl_core::ParleyError;
use pl_runtime::{ChoiceIndexing, RuntimeOptions};

use crate::{
    create_session, emit_boundary_with_saved_state, load_session_for_ref,
    load_source_by_scripts_dir, parse_var, AgentArgs, AgentCommand, ChooseArgs, StartArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, ParleyError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Choose(args) => run_choose(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, ParleyError> {
    let overrides = args
        .var
        .iter()
        .map(|raw| parse_var(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?.with_var_overrides(overrides);
    let options = RuntimeOptions {
        choice_indexing: if args.visible_indexing {
            ChoiceIndexing::Visible
        } else {
            ChoiceIndexing::Declared
        },
    };

    let session = create_session(&scenario, options)?;
    emit_boundary_with_saved_state(&session, &args.state_out)
}

pub(super) fn run_choose(args: ChooseArgs) -> Result<i32, ParleyError> {
    let (_scenario, mut session) = load_session_for_ref(Path::new(&args.state_in))?;
    session.submit(args.choice)?;
    emit_boundary_with_saved_state(&session, &args.state_out)
}
