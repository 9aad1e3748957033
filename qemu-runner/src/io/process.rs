//! Blocking execution of tool invocations.
//!
//! Children inherit stdin/stdout/stderr: the emulator console is interactive and
//! tool diagnostics go straight to the terminal. Nothing is captured and there
//! is no timeout.

use std::fmt;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::{debug, error, instrument, warn};

use crate::core::types::{Invocation, Tool};
use crate::exit_codes;

/// A tool ran but did not exit successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub tool: Tool,
    pub program: String,
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolFailure {
    /// Exit code to surface from the launcher.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(code) if code != exit_codes::OK => code,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(
                f,
                "{} `{}` exited with status {code}",
                self.tool, self.program
            ),
            None => write!(
                f,
                "{} `{}` was terminated by a signal",
                self.tool, self.program
            ),
        }
    }
}

impl std::error::Error for ToolFailure {}

/// Runs an invocation to completion.
pub trait ProcessRunner {
    /// Block until the child exits. A non-successful exit is a [`ToolFailure`].
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runner that spawns real child processes.
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(tool = %invocation.tool, program = invocation.program()))]
    fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!(argv = ?invocation.argv, "spawning child process");
        let status = match Command::new(invocation.program())
            .args(invocation.args())
            .status()
        {
            Ok(status) => status,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| {
                    format!("spawn {} `{}`", invocation.tool, invocation.program())
                });
            }
        };
        check_status(invocation, status)
    }
}

/// Map a finished child's status to `Ok` or a [`ToolFailure`].
pub fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<()> {
    if status.success() {
        debug!(tool = %invocation.tool, "command finished");
        return Ok(());
    }
    warn!(tool = %invocation.tool, exit_code = ?status.code(), "command failed");
    Err(ToolFailure {
        tool: invocation.tool,
        program: invocation.program().to_string(),
        code: status.code(),
    }
    .into())
}
