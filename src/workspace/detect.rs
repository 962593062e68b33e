//! Attribution of paths and projects to configured workspace roots.

use std::path::Path;

use crate::util::fs::{equivalent_paths, has_path_prefix};
use crate::workspace::{WorkspaceContext, WorkspaceError};

impl WorkspaceContext {
    /// The first configured root whose `src` subtree contains `path`.
    ///
    /// Roots are tried in configuration order and the first match wins;
    /// there is no longest-prefix tie-break. Comparison folds case only
    /// when the context says the filesystem does.
    pub fn detect_root(&self, path: &Path) -> Result<&Path, WorkspaceError> {
        for root in self.roots() {
            if has_path_prefix(path, &root.join("src"), self.is_case_insensitive()) {
                return Ok(root.as_path());
            }
        }
        Err(WorkspaceError::PathNotInWorkspace {
            path: path.to_path_buf(),
        })
    }

    /// Reconcile the two views of a project root - as found (possibly via
    /// symlink) and with symlinks dereferenced - against the configured
    /// roots.
    ///
    /// Guessing from partial information would non-deterministically
    /// mis-attribute a project to the wrong workspace, so a missing view
    /// is an error rather than a fallback. When both views are known:
    /// the same root on both sides wins; different roots are ambiguous;
    /// a single match (symlink living outside every workspace, target
    /// inside one, or the reverse) is authoritative; no match at all is
    /// not-in-workspace.
    pub fn detect_project_root(
        &self,
        abs_root: Option<&Path>,
        resolved_abs_root: Option<&Path>,
    ) -> Result<&Path, WorkspaceError> {
        let (abs, resolved) = match (abs_root, resolved_abs_root) {
            (Some(abs), Some(resolved)) => (abs, resolved),
            (one, other) => {
                let path = one.or(other).map(Path::to_path_buf).unwrap_or_default();
                return Err(WorkspaceError::AmbiguousRoot {
                    path,
                    cause: "both the original and the symlink-resolved project root \
                            must be known"
                        .to_string(),
                });
            }
        };

        match (self.detect_root(abs), self.detect_root(resolved)) {
            (Ok(abs_match), Ok(resolved_match)) => {
                if equivalent_paths(abs_match, resolved_match, self.is_case_insensitive()) {
                    Ok(abs_match)
                } else {
                    Err(WorkspaceError::AmbiguousRoot {
                        path: abs.to_path_buf(),
                        cause: format!(
                            "{} is under {} but its resolved path {} is under {}",
                            abs.display(),
                            abs_match.display(),
                            resolved.display(),
                            resolved_match.display()
                        ),
                    })
                }
            }
            (Ok(root), Err(_)) | (Err(_), Ok(root)) => {
                tracing::debug!(
                    root = %root.display(),
                    "one project root view falls outside every workspace; \
                     using the matching view"
                );
                Ok(root)
            }
            (Err(_), Err(_)) => Err(WorkspaceError::PathNotInWorkspace {
                path: abs.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::workspace::{WorkspaceContext, WorkspaceError};

    fn two_root_context() -> WorkspaceContext {
        WorkspaceContext::new(
            "/work",
            vec![PathBuf::from("/go"), PathBuf::from("/go-two")],
        )
        .unwrap()
    }

    #[test]
    fn test_detect_root_first_match_in_configuration_order() {
        let ctx = two_root_context();

        let root = ctx
            .detect_root(Path::new("/go/src/github.com/username/package"))
            .unwrap();
        assert_eq!(root, Path::new("/go"));

        let root = ctx
            .detect_root(Path::new("/go-two/src/github.com/username/package"))
            .unwrap();
        assert_eq!(root, Path::new("/go-two"));

        let err = ctx
            .detect_root(Path::new("/code/src/github.com/username/package"))
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::PathNotInWorkspace { .. }));
    }

    #[test]
    fn test_detect_root_folds_case_only_when_configured() {
        let ctx = two_root_context().with_case_insensitive(true);
        let root = ctx
            .detect_root(Path::new("/GO/SRC/github.com/username/package"))
            .unwrap();
        assert_eq!(root, Path::new("/go"));

        let ctx = two_root_context().with_case_insensitive(false);
        assert!(ctx
            .detect_root(Path::new("/GO/SRC/github.com/username/package"))
            .is_err());
    }

    #[test]
    fn test_detect_project_root_requires_both_views() {
        let ctx = two_root_context();
        let inside = Path::new("/go/src/real/path");

        let err = ctx.detect_project_root(None, Some(inside)).unwrap_err();
        assert!(matches!(err, WorkspaceError::AmbiguousRoot { .. }));

        let err = ctx.detect_project_root(Some(inside), None).unwrap_err();
        assert!(matches!(err, WorkspaceError::AmbiguousRoot { .. }));

        let err = ctx.detect_project_root(None, None).unwrap_err();
        assert!(matches!(err, WorkspaceError::AmbiguousRoot { .. }));
    }

    #[test]
    fn test_detect_project_root_same_root_wins() {
        let ctx = two_root_context();

        let root = ctx
            .detect_project_root(
                Some(Path::new("/go/src/sym/path")),
                Some(Path::new("/go/src/real/path")),
            )
            .unwrap();
        assert_eq!(root, Path::new("/go"));
    }

    #[test]
    fn test_detect_project_root_different_roots_are_ambiguous() {
        let ctx = two_root_context();

        let err = ctx
            .detect_project_root(
                Some(Path::new("/go/src/sym/path")),
                Some(Path::new("/go-two/src/real/path")),
            )
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::AmbiguousRoot { .. }));
    }

    #[test]
    fn test_detect_project_root_single_match_is_authoritative() {
        let ctx = two_root_context();

        // A symlink outside every workspace pointing at a real checkout.
        let root = ctx
            .detect_project_root(
                Some(Path::new("/home/user/sym/link")),
                Some(Path::new("/go/src/real/path")),
            )
            .unwrap();
        assert_eq!(root, Path::new("/go"));
    }

    #[test]
    fn test_detect_project_root_no_match_at_all() {
        let ctx = two_root_context();

        let err = ctx
            .detect_project_root(
                Some(Path::new("/home/user/src/sym/path")),
                Some(Path::new("/home/user/src/real/path")),
            )
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::PathNotInWorkspace { .. }));
    }
}
