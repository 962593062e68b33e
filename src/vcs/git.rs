//! Git probe - local command-line interrogation of a checkout.
//!
//! The probe shells out to whatever `git` the user has installed rather
//! than linking a library, so the tool that produced the checkout is also
//! the authority on its state. It never touches the network.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use crate::core::revision::Revision;
use crate::util::process::{find_executable, ProcessBuilder};
use crate::vcs::{ProbeFailure, VcsError};

/// A probe bound to a git executable, optionally wall-clock limited.
#[derive(Debug, Clone)]
pub struct GitProbe {
    /// Resolved git executable; a miss is reported on first use so the
    /// error can name the directory being probed.
    program: Option<PathBuf>,

    /// Per-command wall-clock limit.
    timeout: Option<Duration>,
}

impl GitProbe {
    /// Locate `git` on PATH.
    pub fn new() -> Self {
        GitProbe {
            program: find_executable("git"),
            timeout: None,
        }
    }

    /// Use a specific git executable instead of searching PATH.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        GitProbe {
            program: Some(program.into()),
            timeout: None,
        }
    }

    /// Kill the probe subprocess and fail if any single command runs past
    /// `limit`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Report the version-control state of a checked-out directory.
    ///
    /// A checkout sitting on a branch tip reports the branch; a detached
    /// checkout that coincides with a tag reports the tag; anything else
    /// degrades to the bare commit rather than failing.
    pub fn version_in_workspace(&self, dir: &Path) -> Result<Revision, VcsError> {
        if !dir.join(".git").exists() {
            return Err(VcsError::NotUnderVersionControl {
                path: dir.to_path_buf(),
            });
        }

        let fail = |cause| VcsError::ProbeFailed {
            path: dir.to_path_buf(),
            cause,
        };

        let id = self.head_revision(dir).map_err(fail)?;

        if let Some(branch) = self.current_branch(dir).map_err(fail)? {
            return Ok(Revision::branch(branch, id));
        }

        match self.exact_tag(dir).map_err(fail)? {
            Some(tag) => Ok(Revision::tag(tag, id)),
            None => Ok(Revision::plain(id)),
        }
    }

    /// The commit HEAD currently points at.
    fn head_revision(&self, dir: &Path) -> Result<String, ProbeFailure> {
        let args = ["rev-parse", "HEAD"];
        let output = self.run(dir, &args)?;
        if !output.status.success() {
            return Err(exited(&args, &output));
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        // 40 hex chars for SHA-1 repositories, 64 for SHA-256 ones.
        let plausible =
            matches!(id.len(), 40 | 64) && id.bytes().all(|b| b.is_ascii_hexdigit());
        if !plausible {
            return Err(ProbeFailure::MalformedOutput {
                command: command_line(&args),
                output: id,
            });
        }
        Ok(id)
    }

    /// Branch name when HEAD is attached; `None` when detached.
    fn current_branch(&self, dir: &Path) -> Result<Option<String>, ProbeFailure> {
        // -q makes a detached HEAD a quiet status-1 exit, not an error.
        let args = ["symbolic-ref", "--short", "-q", "HEAD"];
        let output = self.run(dir, &args)?;
        if !output.status.success() {
            return Ok(None);
        }

        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() {
            return Err(ProbeFailure::MalformedOutput {
                command: command_line(&args),
                output: name,
            });
        }
        Ok(Some(name))
    }

    /// Tag pointing exactly at HEAD, if any.
    fn exact_tag(&self, dir: &Path) -> Result<Option<String>, ProbeFailure> {
        let args = ["describe", "--tags", "--exact-match", "HEAD"];
        let output = self.run(dir, &args)?;
        if !output.status.success() {
            // No tag at HEAD; the probe degrades instead of failing.
            return Ok(None);
        }

        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some(name))
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<Output, ProbeFailure> {
        let Some(ref program) = self.program else {
            return Err(ProbeFailure::ToolMissing);
        };

        let command = command_line(args);
        tracing::trace!(%command, dir = %dir.display(), "probing");

        // An ambient GIT_DIR would redirect the probe away from `dir`.
        let builder = ProcessBuilder::new(program)
            .args(args)
            .cwd(dir)
            .env_remove("GIT_DIR");

        match self.timeout {
            Some(limit) => {
                let output = builder.exec_timeout(limit).map_err(|e| ProbeFailure::Spawn {
                    command: command.clone(),
                    message: format!("{e:#}"),
                })?;
                output.ok_or(ProbeFailure::TimedOut { command, limit })
            }
            None => builder.exec().map_err(|e| ProbeFailure::Spawn {
                command,
                message: format!("{e:#}"),
            }),
        }
    }
}

impl Default for GitProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn command_line(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn exited(args: &[&str], output: &Output) -> ProbeFailure {
    let code = output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    ProbeFailure::Exited {
        command: command_line(args),
        code,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
