//! Stable exit codes for the launcher.
//!
//! A tool that exits with a non-zero code has that code propagated unchanged;
//! these constants cover every other outcome.

/// Both tools exited successfully (or `--dry-run`).
pub const OK: i32 = 0;
/// Invalid config, a tool that could not be spawned, or a tool killed by a signal.
pub const FAILURE: i32 = 1;
