//! Quay.lock parsing and staleness checks.
//!
//! The lock is solver output: an ordered list of pinned projects plus a
//! memo of the manifest content it was generated from. A missing lock is
//! the normal first-run state. This core only reads locks; writing them
//! back is the solver's job.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::core::revision::Revision;

/// Fixed file name of the lock.
pub const LOCK_NAME: &str = "Quay.lock";

/// Error produced when a lock fails to parse or validate.
#[derive(Debug, Error)]
pub enum LockError {
    /// The TOML grammar failed; the source error carries line and column.
    #[error(transparent)]
    Syntax(#[from] toml::de::Error),

    /// A pinned project without a usable revision.
    #[error("pinned project `{name}` has an empty revision")]
    MissingRevision { name: String },

    /// A pin cannot pair both a tag and a branch with one revision.
    #[error("pinned project `{name}` carries both a version and a branch")]
    ConflictingPin { name: String },

    /// The same project pinned twice.
    #[error("`{name}` is pinned more than once")]
    DuplicateProject { name: String },
}

/// A single pinned project entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LockedProject {
    /// Import root of the pinned project.
    pub name: String,

    /// Exact revision the solver selected.
    pub revision: String,

    /// Tag paired with the revision, when one was selected.
    #[serde(default)]
    pub version: Option<String>,

    /// Branch paired with the revision, when one was selected.
    #[serde(default)]
    pub branch: Option<String>,

    /// Alternate source recorded at solve time.
    #[serde(default)]
    pub source: Option<String>,
}

impl LockedProject {
    /// The pin as a revision descriptor.
    pub fn to_revision(&self) -> Revision {
        match (&self.version, &self.branch) {
            (Some(tag), _) => Revision::tag(tag, &self.revision),
            (None, Some(branch)) => Revision::branch(branch, &self.revision),
            (None, None) => Revision::plain(&self.revision),
        }
    }
}

/// The parsed Quay.lock.
#[derive(Debug, Clone, Deserialize)]
pub struct Lock {
    /// Digest of the manifest content this lock was generated from.
    pub memo: String,

    /// Pinned projects, in solver output order.
    #[serde(default, rename = "project")]
    pub projects: Vec<LockedProject>,
}

impl Lock {
    /// Parse lock content.
    pub fn parse(content: &str) -> Result<Self, LockError> {
        let lock: Lock = toml::from_str(content)?;
        lock.validate()?;
        Ok(lock)
    }

    fn validate(&self) -> Result<(), LockError> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.revision.is_empty() {
                return Err(LockError::MissingRevision {
                    name: project.name.clone(),
                });
            }
            if project.version.is_some() && project.branch.is_some() {
                return Err(LockError::ConflictingPin {
                    name: project.name.clone(),
                });
            }
            if !seen.insert(project.name.clone()) {
                return Err(LockError::DuplicateProject {
                    name: project.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether the lock was generated from the given manifest fingerprint.
    ///
    /// A mismatch means the manifest changed after the lock was written
    /// and the solver needs to run again.
    pub fn is_current(&self, fingerprint: &str) -> bool {
        self.memo == fingerprint
    }

    /// Look up a pin by import root.
    pub fn project(&self, name: &str) -> Option<&LockedProject> {
        self.projects.iter().find(|p| p.name == name)
    }
}
