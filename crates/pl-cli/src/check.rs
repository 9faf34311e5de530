use pl_api::compile_project_from_sources;
use pl_compiler::CompileOptions;
use pl_core::ParleyError;

use crate::{load_source_by_scripts_dir, CheckArgs, DumpArgs};

pub(super) fn run_check(args: CheckArgs) -> Result<i32, ParleyError> {
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?;
    let compiled = compile_project_from_sources(
        &scenario.sources,
        CompileOptions {
            strict_targets: args.strict,
        },
    )?;

    println!("RESULT:OK");
    println!("LABELS:{}", compiled.dialogue.labels.len());
    println!("INITIAL:{}", compiled.dialogue.initial_label);
    for diagnostic in &compiled.diagnostics {
        println!(
            "DIAGNOSTIC_JSON:{}",
            serde_json::to_string(diagnostic).expect("diagnostic should serialize")
        );
    }
    Ok(0)
}

pub(super) fn run_dump(args: DumpArgs) -> Result<i32, ParleyError> {
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?;
    let compiled = compile_project_from_sources(&scenario.sources, CompileOptions::default())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&compiled.dialogue).expect("dialogue should serialize")
    );
    Ok(0)
}
