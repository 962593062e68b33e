//! Version-control probing of checked-out dependency directories.
//!
//! Only git is modeled; other VCS families are the surrounding tool's
//! problem. Probing is lazy - one directory per call, never an eager
//! sweep of the whole workspace.

pub mod errors;
pub mod git;

pub use errors::{ProbeFailure, VcsError};
pub use git::GitProbe;
