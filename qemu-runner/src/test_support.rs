//! Test-only helpers: a recording process runner and throwaway tool scripts.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::types::{Invocation, Tool};
use crate::io::process::{ProcessRunner, ToolFailure};

/// Runner that records invocations instead of spawning them.
///
/// Optionally fails every invocation of one tool with a given exit code.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    fail: Option<(Tool, Option<i32>)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any invocation of `tool` with `code` (`None` = killed by signal).
    pub fn failing(tool: Tool, code: Option<i32>) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: Some((tool, code)),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        match self.fail {
            Some((tool, code)) if tool == invocation.tool => Err(ToolFailure {
                tool,
                program: invocation.program().to_string(),
                code,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

/// Scratch directory holding fake tool scripts and the log they append to.
pub struct ToolSandbox {
    dir: tempfile::TempDir,
}

impl ToolSandbox {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tool sandbox")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// File every fake tool appends `<name> <args...>` to.
    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    /// Lines appended to the call log so far (empty if no tool ran).
    pub fn logged_calls(&self) -> Result<Vec<String>> {
        let path = self.log_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Write an executable shell script `name` that logs its arguments and exits with `code`.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, code: i32) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> '{}'\nexit {code}\n",
            self.log_path().display()
        );
        fs::write(&path, script).with_context(|| format!("write {}", path.display()))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("chmod {}", path.display()))?;
        Ok(path)
    }

    /// Write a launcher config at `config.toml` pointing at the given tool programs.
    pub fn write_config(&self, converter: &Path, emulator: &Path) -> Result<PathBuf> {
        let path = self.dir.path().join("config.toml");
        let contents = format!(
            "[converter]\nprogram = {:?}\n\n[emulator]\nprogram = {:?}\n",
            converter.display().to_string(),
            emulator.display().to_string()
        );
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
