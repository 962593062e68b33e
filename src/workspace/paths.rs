//! Conversion between absolute paths and import roots.

use std::io;
use std::path::{Path, PathBuf};

use crate::util::fs::strip_path_prefix;
use crate::workspace::{WorkspaceContext, WorkspaceError};

impl WorkspaceContext {
    /// Split the workspace prefix off an absolute path, yielding the
    /// import root below some configured root's `src` directory.
    ///
    /// The first configured root whose `src` subtree contains the path
    /// wins. The remainder comes back in forward-slash form regardless of
    /// the host separator, so it can serve as a canonical identifier.
    pub fn split_absolute_project_root(
        &self,
        abs_path: &Path,
    ) -> Result<String, WorkspaceError> {
        for root in self.roots() {
            let src = root.join("src");
            let Some(rest) = strip_path_prefix(abs_path, &src, self.is_case_insensitive())
            else {
                continue;
            };

            if rest.as_os_str().is_empty() {
                // The bare src directory names no project at all.
                return Err(WorkspaceError::InvalidProjectRoot {
                    path: abs_path.to_path_buf(),
                    reason: format!(
                        "it is the src directory of {} itself, not a project below it",
                        root.display()
                    ),
                });
            }

            let import_root = rest
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            return Ok(import_root);
        }

        Err(WorkspaceError::PathNotInWorkspace {
            path: abs_path.to_path_buf(),
        })
    }

    /// Join an import root onto the primary configured root's `src` tree,
    /// yielding the absolute directory that holds the project.
    ///
    /// The directory must already exist on disk; this resolves identity,
    /// it does not materialize checkouts.
    pub fn absolute_project_root(&self, import_root: &str) -> Result<PathBuf, WorkspaceError> {
        let Some(primary) = self.primary_root() else {
            return Err(WorkspaceError::PathNotInWorkspace {
                path: PathBuf::from(import_root),
            });
        };

        let mut path = primary.join("src");
        for segment in import_root.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(WorkspaceError::InvalidProjectRoot {
                path,
                reason: "exists but is not a directory".to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WorkspaceError::ManifestNotFound {
                    path,
                    reason: "directory does not exist".to_string(),
                })
            }
            Err(source) => Err(WorkspaceError::Io { path, source }),
        }
    }
}
