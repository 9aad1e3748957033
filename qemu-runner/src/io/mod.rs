//! I/O helpers for launching the external tools.

pub mod config;
pub mod process;
