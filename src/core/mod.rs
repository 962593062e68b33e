//! Core data model: manifests, locks, projects, and revisions.

pub mod lock;
pub mod manifest;
pub mod project;
pub mod revision;

pub use lock::{Lock, LockedProject};
pub use manifest::{Constraint, Manifest};
pub use project::Project;
pub use revision::Revision;
