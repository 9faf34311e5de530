use std::collections::BTreeMap;

use pl_compiler::{compile_dialogue_with_options, CompileOptions, CompileResult};
use pl_core::{Dialogue, ParleyError, Sexpr};
use pl_reader::read_source;
use pl_runtime::{DialogueHost, DialogueRuntime, RuntimeOptions, RuntimeSnapshot};

pub mod sandbox;

pub use sandbox::{PawnPosition, SandboxHost, SandboxState, SELF_PAWN, SELF_PAWN_HANDLE};

#[derive(Debug, Clone, Default)]
pub struct CreateRuntimeOptions {
    /// Source text keyed by path; files are read in key order as one program.
    pub sources: BTreeMap<String, String>,
    pub compile: CompileOptions,
    pub runtime: RuntimeOptions,
}

#[derive(Debug, Clone)]
pub struct ResumeRuntimeOptions {
    pub sources: BTreeMap<String, String>,
    pub snapshot: RuntimeSnapshot,
}

pub fn compile_dialogue_from_source(source: &str) -> Result<Dialogue, ParleyError> {
    compile_project_from_source(source, CompileOptions::default()).map(|result| result.dialogue)
}

pub fn compile_project_from_source(
    source: &str,
    options: CompileOptions,
) -> Result<CompileResult, ParleyError> {
    let exprs = read_source(source)?;
    compile_dialogue_with_options(&exprs, options)
}

/// Reads every file separately (so spans stay file-relative) and compiles
/// the forms as a single dialogue.
pub fn compile_project_from_sources(
    sources: &BTreeMap<String, String>,
    options: CompileOptions,
) -> Result<CompileResult, ParleyError> {
    let mut exprs: Vec<Sexpr> = Vec::new();
    for (path, source) in sources {
        let mut file_exprs = read_source(source).map_err(|error| in_file(path, error))?;
        exprs.append(&mut file_exprs);
    }
    compile_dialogue_with_options(&exprs, options)
}

pub fn create_runtime_from_source(
    options: CreateRuntimeOptions,
    host: &mut dyn DialogueHost,
) -> Result<DialogueRuntime, ParleyError> {
    let compiled = compile_project_from_sources(&options.sources, options.compile)?;
    DialogueRuntime::start(compiled.dialogue, options.runtime, host)
}

pub fn resume_runtime_from_source(
    options: ResumeRuntimeOptions,
    host: &mut dyn DialogueHost,
) -> Result<DialogueRuntime, ParleyError> {
    let compiled = compile_project_from_sources(&options.sources, CompileOptions::default())?;
    DialogueRuntime::resume(compiled.dialogue, &options.snapshot, host)
}

fn in_file(path: &str, mut error: ParleyError) -> ParleyError {
    error.message = format!("{}: {}", path, error.message);
    error
}
