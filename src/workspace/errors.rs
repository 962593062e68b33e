//! Workspace error kinds and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::lock::LockError;
use crate::core::manifest::ManifestError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while resolving paths and roots or loading a project.
///
/// Every variant names the offending path; ambiguity is always surfaced
/// rather than resolved by guessing.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The path is not inside the `src` subtree of any configured root.
    #[error("{} is not within the src directory of any configured workspace root", path.display())]
    PathNotInWorkspace { path: PathBuf },

    /// The available views of a project root cannot be reconciled to a
    /// single configured root.
    #[error("workspace root for {} is ambiguous: {cause}", path.display())]
    AmbiguousRoot { path: PathBuf, cause: String },

    /// A path that is inside a workspace but does not name a usable
    /// project root.
    #[error("invalid project root {}: {reason}", path.display())]
    InvalidProjectRoot { path: PathBuf, reason: String },

    /// A manifest, or the directory that would hold one, was not found.
    #[error("no project found at {}: {reason}", path.display())]
    ManifestNotFound { path: PathBuf, reason: String },

    /// The manifest failed to parse or validate.
    #[error("invalid manifest {}", path.display())]
    ManifestSyntax {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    /// The lock failed to parse or validate.
    #[error("invalid lock {}", path.display())]
    LockSyntax {
        path: PathBuf,
        #[source]
        source: LockError,
    },

    /// An underlying filesystem operation failed.
    #[error("filesystem error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkspaceError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            WorkspaceError::PathNotInWorkspace { path } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_suggestion(suggestions::NOT_IN_WORKSPACE),

            WorkspaceError::AmbiguousRoot { path, .. } => {
                Diagnostic::error(self.to_string()).with_location(path)
            }

            WorkspaceError::InvalidProjectRoot { path, .. } => {
                Diagnostic::error(self.to_string()).with_location(path)
            }

            WorkspaceError::ManifestNotFound { path, .. } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_suggestion(suggestions::NO_MANIFEST),

            WorkspaceError::ManifestSyntax { path, source } => {
                Diagnostic::error(self.to_string())
                    .with_location(path)
                    .with_context(source.to_string())
            }

            WorkspaceError::LockSyntax { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::STALE_LOCK),

            WorkspaceError::Io { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string()),
        }
    }
}
