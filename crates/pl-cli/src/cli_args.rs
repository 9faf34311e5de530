use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pl-cli")]
#[command(about = "Parley dialogue player and agent CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// One-shot commands that exchange player state through files.
    Agent(AgentArgs),
    /// Interactive player.
    Tui(TuiArgs),
    /// Compile the scripts and report diagnostics.
    Check(CheckArgs),
    /// Print the compiled dialogue as JSON.
    Dump(DumpArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    /// Enter the initial label and write the first choice boundary.
    Start(StartArgs),
    /// Resume a saved state, submit one choice, write the next boundary.
    Choose(ChooseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    /// Host variable as `name=value`; overrides `host.json`.
    #[arg(long = "var")]
    pub(crate) var: Vec<String>,
    /// Number choices by their position in the shown list.
    #[arg(long = "visible-indexing")]
    pub(crate) visible_indexing: bool,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    /// Index printed on the `CHOICE:` line.
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
    #[arg(long = "var")]
    pub(crate) var: Vec<String>,
    /// Plain stdin/stdout mode instead of the full-screen player.
    #[arg(long = "line")]
    pub(crate) line: bool,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    /// Treat dangling jump targets as errors.
    #[arg(long = "strict")]
    pub(crate) strict: bool,
}

#[derive(Debug, Args)]
pub(crate) struct DumpArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
}
