//! Quay - workspace resolution core for a dependency management tool.
//!
//! This crate answers one question deterministically: where does a project
//! live? It maps a project's source tree onto one or more configured
//! workspace roots, reconciles symlinked views of that mapping, loads the
//! project's persisted dependency declarations (manifest and optional
//! lock), and determines the version-control state of dependency trees
//! already checked out inside a workspace.
//!
//! Dependency solving, lock writing, and network I/O are the surrounding
//! tool's business; this crate only resolves identity and reads state.

pub mod core;
pub mod util;
pub mod vcs;
pub mod workspace;

pub use crate::core::{
    lock::{Lock, LockedProject, LOCK_NAME},
    manifest::{Constraint, Manifest, MANIFEST_NAME},
    project::Project,
    revision::Revision,
};
pub use crate::vcs::{GitProbe, ProbeFailure, VcsError};
pub use crate::workspace::{WorkspaceContext, WorkspaceError};
