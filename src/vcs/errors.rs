//! Version-probe error kinds and diagnostics.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while probing a checked-out directory.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The directory carries no recognized version-control metadata.
    #[error("{} is not under version control", path.display())]
    NotUnderVersionControl { path: PathBuf },

    /// The probe itself failed: missing tool, unexpected exit, malformed
    /// output, or timeout.
    #[error("version probe failed for {}", path.display())]
    ProbeFailed {
        path: PathBuf,
        #[source]
        cause: ProbeFailure,
    },
}

/// Why a probe failed.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// No git executable was found on PATH.
    #[error("`git` executable not found on PATH")]
    ToolMissing,

    /// The probe subprocess ran past its wall-clock limit and was killed.
    #[error("`{command}` timed out after {limit:?}")]
    TimedOut { command: String, limit: Duration },

    /// The subprocess could not be spawned or waited on.
    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    /// The subprocess exited unsuccessfully.
    #[error("`{command}` exited with {code}: {stderr}")]
    Exited {
        command: String,
        code: String,
        stderr: String,
    },

    /// The subprocess succeeded but printed something unusable.
    #[error("unexpected output from `{command}`: {output:?}")]
    MalformedOutput { command: String, output: String },
}

impl VcsError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            VcsError::NotUnderVersionControl { path } => {
                Diagnostic::error(self.to_string()).with_location(path)
            }
            VcsError::ProbeFailed { path, cause } => {
                let diag = Diagnostic::error(self.to_string())
                    .with_location(path)
                    .with_context(cause.to_string());
                match cause {
                    ProbeFailure::ToolMissing => diag.with_suggestion(suggestions::GIT_MISSING),
                    _ => diag,
                }
            }
        }
    }
}
