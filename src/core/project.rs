//! A loaded project.
//!
//! A Project is assembled fresh by each loader call and never cached or
//! shared; it carries both views of its root directory (as found, and
//! with symlinks dereferenced) so root attribution stays deterministic.

use std::path::{Path, PathBuf};

use crate::core::lock::Lock;
use crate::core::manifest::Manifest;
use crate::workspace::{WorkspaceContext, WorkspaceError};

/// A project: its manifest, optional lock, and where it lives on disk.
#[derive(Debug)]
pub struct Project {
    /// Root directory as originally found, possibly through a symlink.
    abs_root: PathBuf,

    /// Root directory with every symlink dereferenced.
    resolved_abs_root: PathBuf,

    /// Canonical import-path-style identifier below a root's src tree.
    import_root: String,

    /// Parsed manifest.
    manifest: Manifest,

    /// Parsed lock, absent on first run.
    lock: Option<Lock>,
}

impl Project {
    /// Assemble a project from its parts.
    pub fn new(
        abs_root: PathBuf,
        resolved_abs_root: PathBuf,
        import_root: String,
        manifest: Manifest,
        lock: Option<Lock>,
    ) -> Self {
        Project {
            abs_root,
            resolved_abs_root,
            import_root,
            manifest,
            lock,
        }
    }

    /// Root directory as originally found, possibly through a symlink.
    pub fn abs_root(&self) -> &Path {
        &self.abs_root
    }

    /// Root directory with every symlink dereferenced.
    pub fn resolved_abs_root(&self) -> &Path {
        &self.resolved_abs_root
    }

    /// Canonical import root relative to a workspace root's src tree.
    pub fn import_root(&self) -> &str {
        &self.import_root
    }

    /// The parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The parsed lock, if one was present.
    pub fn lock(&self) -> Option<&Lock> {
        self.lock.as_ref()
    }

    /// Whether the lock exists and matches the current manifest content.
    pub fn lock_is_current(&self) -> bool {
        self.lock
            .as_ref()
            .is_some_and(|lock| lock.is_current(&self.manifest.fingerprint()))
    }

    /// The unique workspace root this project belongs to.
    pub fn workspace_root<'c>(
        &self,
        ctx: &'c WorkspaceContext,
    ) -> Result<&'c Path, WorkspaceError> {
        ctx.detect_project_root(Some(self.abs_root()), Some(self.resolved_abs_root()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with(manifest: &str, lock: Option<&str>) -> Project {
        Project::new(
            PathBuf::from("/go/src/github.com/user/app"),
            PathBuf::from("/go/src/github.com/user/app"),
            "github.com/user/app".to_string(),
            Manifest::parse(manifest).unwrap(),
            lock.map(|l| Lock::parse(l).unwrap()),
        )
    }

    #[test]
    fn test_accessors() {
        let project = project_with("", None);
        assert_eq!(project.import_root(), "github.com/user/app");
        assert!(project.lock().is_none());
        assert!(!project.lock_is_current());
    }

    #[test]
    fn test_lock_is_current_tracks_manifest_content() {
        let manifest_text = "[[constraint]]\nname = \"github.com/pkg/errors\"\n";
        let manifest = Manifest::parse(manifest_text).unwrap();
        let lock_text = format!("memo = \"{}\"", manifest.fingerprint());

        let current = project_with(manifest_text, Some(&lock_text));
        assert!(current.lock_is_current());

        // Same lock against a manifest that grew a constraint.
        let grown = "[[constraint]]\nname = \"github.com/pkg/errors\"\n\n[[constraint]]\nname = \"github.com/other/dep\"\n";
        let stale = project_with(grown, Some(&lock_text));
        assert!(!stale.lock_is_current());
    }
}
