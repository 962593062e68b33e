//! Workspace configuration: roots and working directory.

use std::path::{Path, PathBuf};

use crate::util::fs::{equivalent_paths, host_is_case_insensitive};
use crate::workspace::WorkspaceError;

/// Explicit per-invocation configuration: the current working directory
/// plus the ordered list of configured workspace roots.
///
/// The surrounding tool constructs one of these at startup and threads it
/// into every operation; nothing in this crate reads process-wide
/// environment state. A context is immutable once built and cheap to
/// share by reference across independent call sites.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// Current working directory (absolute).
    working_dir: PathBuf,

    /// Configured roots, deduplicated, in configuration order.
    roots: Vec<PathBuf>,

    /// Whether root comparison folds letter case.
    case_insensitive: bool,
}

impl WorkspaceContext {
    /// Create a context from a working directory and configured roots.
    ///
    /// The working directory must be absolute. Relative roots are resolved
    /// against it; duplicate roots collapse to their first occurrence,
    /// compared with the host filesystem's case semantics.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        roots: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self, WorkspaceError> {
        let working_dir = working_dir.into();
        if !working_dir.is_absolute() {
            return Err(WorkspaceError::InvalidProjectRoot {
                path: working_dir,
                reason: "working directory must be an absolute path".to_string(),
            });
        }

        let mut ctx = WorkspaceContext {
            working_dir,
            roots: Vec::new(),
            case_insensitive: host_is_case_insensitive(),
        };
        for root in roots {
            let root = if root.is_absolute() {
                root
            } else {
                ctx.working_dir.join(root)
            };
            ctx.push_root(root);
        }

        tracing::debug!(
            working_dir = %ctx.working_dir.display(),
            roots = ctx.roots.len(),
            "workspace context created"
        );
        Ok(ctx)
    }

    /// Override filesystem case sensitivity.
    ///
    /// The default follows the platform; the override exists for tests and
    /// for unusual mounts (e.g. a case-insensitive volume on Linux).
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        let roots = std::mem::take(&mut self.roots);
        for root in roots {
            self.push_root(root);
        }
        self
    }

    fn push_root(&mut self, root: PathBuf) {
        let duplicate = self
            .roots
            .iter()
            .any(|r| equivalent_paths(r, &root, self.case_insensitive));
        if !duplicate {
            self.roots.push(root);
        }
    }

    /// The current working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Configured roots, in configuration order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The first configured root, where import paths are materialized.
    pub fn primary_root(&self) -> Option<&Path> {
        self.roots.first().map(PathBuf::as_path)
    }

    /// Whether root comparison folds letter case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_dir_must_be_absolute() {
        let err = WorkspaceContext::new("relative/dir", vec![]).unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidProjectRoot { .. }));
    }

    #[test]
    fn test_relative_roots_resolve_against_working_dir() {
        let ctx = WorkspaceContext::new("/work", vec![PathBuf::from("go")]).unwrap();
        assert_eq!(ctx.roots(), &[PathBuf::from("/work/go")]);
    }

    #[test]
    fn test_duplicate_roots_collapse_in_order() {
        let ctx = WorkspaceContext::new(
            "/work",
            vec![
                PathBuf::from("/go"),
                PathBuf::from("/go-two"),
                PathBuf::from("/go"),
            ],
        )
        .unwrap();
        assert_eq!(ctx.roots(), &[PathBuf::from("/go"), PathBuf::from("/go-two")]);
        assert_eq!(ctx.primary_root(), Some(Path::new("/go")));
    }

    #[test]
    fn test_case_folded_duplicates_collapse() {
        let ctx = WorkspaceContext::new(
            "/work",
            vec![PathBuf::from("/Go"), PathBuf::from("/go")],
        )
        .unwrap()
        .with_case_insensitive(true);
        assert_eq!(ctx.roots().len(), 1);

        let ctx = WorkspaceContext::new(
            "/work",
            vec![PathBuf::from("/Go"), PathBuf::from("/go")],
        )
        .unwrap()
        .with_case_insensitive(false);
        assert_eq!(ctx.roots().len(), 2);
    }

    #[test]
    fn test_empty_roots_are_permitted() {
        let ctx = WorkspaceContext::new("/work", vec![]).unwrap();
        assert!(ctx.roots().is_empty());
        assert!(ctx.primary_root().is_none());
    }
}
