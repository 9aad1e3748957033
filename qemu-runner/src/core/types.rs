//! Run parameters and invocation values shared by the builders.
//!
//! Values are constructed once per launch and never mutated afterwards.

use std::fmt;

/// Init program started when none is requested.
pub const DEFAULT_INIT: &str = "/bin/sh";
/// Root filesystem image handed to the emulator as the initial ramdisk.
pub const DEFAULT_ROOTFS: &str = "moss.img";
pub const DEFAULT_CPU: &str = "cortex-a72";
pub const DEFAULT_SMP: u32 = 4;
pub const DEFAULT_MEMORY: &str = "2G";

/// User-supplied parameters for a single launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParameters {
    /// Path to the compiled executable image (conventionally `*.elf`).
    pub executable_path: String,
    /// Init program path inside the root filesystem.
    pub init_path: String,
    pub rootfs_path: String,
    pub cpu_model: String,
    pub core_count: u32,
    /// Emulator memory size, passed through verbatim (e.g. `2G`).
    pub memory_size: String,
    /// Stop the emulated CPU at startup so a debugger can attach.
    pub debug_enabled: bool,
}

impl RunParameters {
    /// Parameters for `executable_path` with every other field at its default.
    pub fn new(executable_path: impl Into<String>) -> Self {
        Self {
            executable_path: executable_path.into(),
            init_path: DEFAULT_INIT.to_string(),
            rootfs_path: DEFAULT_ROOTFS.to_string(),
            cpu_model: DEFAULT_CPU.to_string(),
            core_count: DEFAULT_SMP,
            memory_size: DEFAULT_MEMORY.to_string(),
            debug_enabled: false,
        }
    }
}

/// External tool an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Converts the executable image into a flat binary.
    Converter,
    /// Boots the flat binary.
    Emulator,
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Converter => "converter",
            Tool::Emulator => "emulator",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A flat argv for one tool run. The first token is the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub argv: Vec<String>,
}

impl Invocation {
    pub fn new(tool: Tool, argv: Vec<String>) -> Self {
        Self { tool, argv }
    }

    /// Program token, or `""` for an empty argv.
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }
}

/// Tokens joined by single spaces, without quoting.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
