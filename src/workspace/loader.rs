//! Project loading: locate, parse, assemble.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::core::lock::{Lock, LOCK_NAME};
use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::core::project::Project;
use crate::util::fs::resolve_symlinks;
use crate::workspace::{WorkspaceContext, WorkspaceError};

impl WorkspaceContext {
    /// Load the project governing the working directory.
    ///
    /// Walks from the working directory toward the filesystem root and
    /// stops at the closest directory containing `Quay.toml`; that
    /// directory becomes the project root. The manifest is mandatory and
    /// is parsed before the lock is even looked at; a `Quay.lock` in the
    /// same directory is parsed when present, and its absence is the
    /// normal first-run state. A directory holding only a lock is never a
    /// project root.
    pub fn load_project(&self) -> Result<Project, WorkspaceError> {
        let abs_root = self.find_project_root()?;
        tracing::debug!(root = %abs_root.display(), "found project manifest");

        let resolved_abs_root =
            resolve_symlinks(&abs_root).map_err(|source| WorkspaceError::Io {
                path: abs_root.clone(),
                source,
            })?;

        // The found directory may be a symlinked view living outside every
        // workspace; either view may carry the workspace prefix.
        let import_root = match self.split_absolute_project_root(&abs_root) {
            Ok(import_root) => import_root,
            Err(WorkspaceError::PathNotInWorkspace { .. }) => {
                self.split_absolute_project_root(&resolved_abs_root)?
            }
            Err(err) => return Err(err),
        };

        let manifest_path = abs_root.join(MANIFEST_NAME);
        let manifest_text =
            fs::read_to_string(&manifest_path).map_err(|source| WorkspaceError::Io {
                path: manifest_path.clone(),
                source,
            })?;
        let manifest =
            Manifest::parse(&manifest_text).map_err(|source| WorkspaceError::ManifestSyntax {
                path: manifest_path,
                source,
            })?;

        let lock_path = abs_root.join(LOCK_NAME);
        let lock = match fs::read_to_string(&lock_path) {
            Ok(text) => Some(Lock::parse(&text).map_err(|source| WorkspaceError::LockSyntax {
                path: lock_path,
                source,
            })?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(WorkspaceError::Io {
                    path: lock_path,
                    source,
                })
            }
        };

        Ok(Project::new(
            abs_root,
            resolved_abs_root,
            import_root,
            manifest,
            lock,
        ))
    }

    /// The closest ancestor of the working directory (itself included)
    /// that directly contains `Quay.toml`.
    fn find_project_root(&self) -> Result<PathBuf, WorkspaceError> {
        let mut current = self.working_dir().to_path_buf();
        loop {
            if current.join(MANIFEST_NAME).is_file() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(WorkspaceError::ManifestNotFound {
                    path: self.working_dir().to_path_buf(),
                    reason: format!("no {MANIFEST_NAME} in this directory or any parent"),
                });
            }
        }
    }
}
