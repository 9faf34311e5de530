use std::fmt::Display;
use std::path::Path;

use pl_core::ParleyError;

/// CLI-side failure sites. Each one owns a protocol error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CliFailure {
    TuiIo,
    SourcePath,
    SourceScan,
    SourceRead,
    HostInvalid,
    StateWrite,
    StateRead,
    StateInvalid,
}

impl CliFailure {
    pub(crate) fn code(self) -> &'static str {
        match self {
            Self::TuiIo => "TUI_IO",
            Self::SourcePath => "CLI_SOURCE_PATH",
            Self::SourceScan => "CLI_SOURCE_SCAN",
            Self::SourceRead => "CLI_SOURCE_READ",
            Self::HostInvalid => "CLI_HOST_INVALID",
            Self::StateWrite => "CLI_STATE_WRITE",
            Self::StateRead => "CLI_STATE_READ",
            Self::StateInvalid => "CLI_STATE_INVALID",
        }
    }

    /// `map_err` adapter for failures with no file to name.
    pub(crate) fn wrap<E: Display>(self) -> impl Fn(E) -> ParleyError {
        move |error| ParleyError::host(self.code(), error.to_string())
    }

    /// `map_err` adapter that prefixes the message with `path`.
    pub(crate) fn at<E: Display>(self, path: &Path) -> impl Fn(E) -> ParleyError + '_ {
        move |error| ParleyError::host(self.code(), format!("{}: {}", path.display(), error))
    }
}

/// Prints the error block of the agent protocol and returns the exit code.
pub(crate) fn emit_error(error: ParleyError) -> i32 {
    tracing::debug!(code = %error.code, "command failed");
    let message = serde_json::to_string(&error.message).expect("string json");
    println!("RESULT:ERROR\nERROR_CODE:{}\nERROR_MSG_JSON:{}", error.code, message);
    1
}
