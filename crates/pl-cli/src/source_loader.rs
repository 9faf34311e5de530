use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pl_api::SandboxState;
use pl_core::ParleyError;
use walkdir::WalkDir;

use crate::{CliFailure, LoadedScenario};

pub(crate) const SCRIPT_EXTENSION: &str = "dlg";
pub(crate) const HOST_FILE: &str = "host.json";
const SCENARIO_REF_PREFIX: &str = "scripts-dir:";

pub(crate) fn load_source_by_scripts_dir(scripts_dir: &str) -> Result<LoadedScenario, ParleyError> {
    let scripts_root = resolve_scripts_dir(scripts_dir)?;
    let sources = read_scripts_from_dir(&scripts_root)?;
    let initial_host = read_host_state(&scripts_root)?;
    let title = format!(
        "Scripts {}",
        scripts_root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
    );
    tracing::debug!(dir = %scripts_root.display(), files = sources.len(), "loaded scripts");

    Ok(LoadedScenario {
        id: make_scripts_dir_scenario_id(&scripts_root),
        title,
        sources,
        initial_host,
    })
}

pub(crate) fn load_source_by_ref(scenario_ref: &str) -> Result<LoadedScenario, ParleyError> {
    let Some(raw) = scenario_ref.strip_prefix(SCENARIO_REF_PREFIX) else {
        return Err(ParleyError::host(
            "CLI_SOURCE_REF_INVALID",
            format!("Unsupported scenario ref: {}", scenario_ref),
        ));
    };
    load_source_by_scripts_dir(raw)
}

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, ParleyError> {
    let path = PathBuf::from(scripts_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(CliFailure::SourcePath.wrap())?
            .join(path)
    };

    if !absolute.exists() {
        return Err(ParleyError::host(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }
    if !absolute.is_dir() {
        return Err(ParleyError::host(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }
    Ok(absolute)
}

/// Every `*.dlg` file below `scripts_dir`, keyed by its `/`-separated
/// relative path.
pub(crate) fn read_scripts_from_dir(
    scripts_dir: &Path,
) -> Result<BTreeMap<String, String>, ParleyError> {
    let mut scripts = BTreeMap::new();

    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCRIPT_EXTENSION) {
            continue;
        }

        let relative = path
            .strip_prefix(scripts_dir)
            .map_err(CliFailure::SourceScan.wrap())?
            .to_string_lossy()
            .replace('\\', "/");
        let content = fs::read_to_string(path).map_err(CliFailure::SourceRead.at(path))?;
        scripts.insert(relative, content);
    }

    if scripts.is_empty() {
        return Err(ParleyError::host(
            "CLI_SOURCE_EMPTY",
            format!("No .{} files under {}", SCRIPT_EXTENSION, scripts_dir.display()),
        ));
    }
    Ok(scripts)
}

/// Optional `host.json` next to the scripts; absent means an empty sandbox.
pub(crate) fn read_host_state(scripts_dir: &Path) -> Result<SandboxState, ParleyError> {
    let path = scripts_dir.join(HOST_FILE);
    if !path.is_file() {
        return Ok(SandboxState::default());
    }
    let raw = fs::read_to_string(&path).map_err(CliFailure::SourceRead.at(&path))?;
    serde_json::from_str(&raw).map_err(CliFailure::HostInvalid.at(&path))
}

pub(crate) fn make_scripts_dir_scenario_id(scripts_dir: &Path) -> String {
    format!("{}{}", SCENARIO_REF_PREFIX, scripts_dir.display())
}

/// Parses a `--var name=value` flag.
pub(crate) fn parse_var(raw: &str) -> Result<(String, f64), ParleyError> {
    let invalid = || {
        ParleyError::host(
            "CLI_VAR_INVALID",
            format!("Expected name=number, got \"{}\".", raw),
        )
    };
    let (name, value) = raw.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let value: f64 = value.trim().parse().map_err(|_| invalid())?;
    Ok((name.to_string(), value))
}
