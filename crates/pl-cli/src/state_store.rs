use std::fs;
use std::path::Path;

use pl_core::ParleyError;

use crate::{CliFailure, PlayerState, PLAYER_STATE_SCHEMA};

pub(crate) fn save_player_state(path: &Path, state: &PlayerState) -> Result<(), ParleyError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(CliFailure::StateWrite.at(parent))?;

    let payload = serde_json::to_string(state).expect("player state should serialize");
    fs::write(path, payload).map_err(CliFailure::StateWrite.at(path))
}

pub(crate) fn load_player_state(path: &Path) -> Result<PlayerState, ParleyError> {
    if !path.exists() {
        return Err(ParleyError::host(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(CliFailure::StateRead.at(path))?;
    let state: PlayerState =
        serde_json::from_str(&raw).map_err(CliFailure::StateInvalid.at(path))?;

    if state.schema_version != PLAYER_STATE_SCHEMA {
        return Err(ParleyError::host(
            "CLI_STATE_SCHEMA",
            format!("Unsupported player state schema: {}", state.schema_version),
        ));
    }
    Ok(state)
}
