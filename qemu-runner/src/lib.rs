//! Launch builder for booting a compiled kernel image under QEMU.
//!
//! A launch converts an ELF executable into a flat binary with the artifact
//! converter, then boots that binary in the emulator with a synthesized option
//! table and kernel command line. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic argument synthesis. No I/O, fully testable
//!   in isolation.
//! - **[`io`]**: Side-effecting operations (config files, process execution).
//!
//! [`launch`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod launch;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
