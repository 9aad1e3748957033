//! Deterministic, pure argument synthesis.
//!
//! Core modules must be free of I/O side effects. They turn run parameters into
//! argument vectors and return identical outputs for identical inputs.

pub mod artifact;
pub mod init_args;
pub mod options;
pub mod plan;
pub mod types;
