//! QEMU launcher for compiled kernel images.
//!
//! Converts `<executable>.elf` to `<executable>.bin` and boots it in
//! `qemu-system-aarch64` with the requested init program and root filesystem.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use qemu_runner::core::plan::{PlanSettings, build_plan};
use qemu_runner::core::types::{
    DEFAULT_CPU, DEFAULT_INIT, DEFAULT_MEMORY, DEFAULT_ROOTFS, DEFAULT_SMP, RunParameters,
};
use qemu_runner::exit_codes;
use qemu_runner::io::config::load_config;
use qemu_runner::io::process::{SystemRunner, ToolFailure};
use qemu_runner::launch::launch;
use qemu_runner::logging;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "qemu-runner",
    version,
    about = "Convert an ELF executable and boot it under QEMU"
)]
struct Cli {
    /// Location of the compiled ELF executable to run.
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    elf_executable: String,

    /// Location of the init process (in the rootfs).
    #[arg(long, default_value = DEFAULT_INIT)]
    init: String,

    /// Location of the root filesystem image to use.
    #[arg(long, default_value = DEFAULT_ROOTFS)]
    rootfs: String,

    #[arg(long, default_value = DEFAULT_CPU)]
    cpu: String,

    /// Number of CPU cores to use.
    #[arg(long, default_value_t = DEFAULT_SMP)]
    smp: u32,

    #[arg(long, default_value = DEFAULT_MEMORY)]
    memory: String,

    /// Stop the CPU at startup and wait for a debugger.
    #[arg(long)]
    debug: bool,

    /// Launcher config (TOML) overriding tool programs and emulator options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the converter and emulator command lines without running them.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn run_parameters(&self) -> RunParameters {
        RunParameters {
            executable_path: self.elf_executable.clone(),
            init_path: self.init.clone(),
            rootfs_path: self.rootfs.clone(),
            cpu_model: self.cpu.clone(),
            core_count: self.smp,
            memory_size: self.memory.clone(),
            debug_enabled: self.debug,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::from(exit_status_byte(exit_codes::OK)),
        Err(err) => {
            // The failing tool has already reported on the inherited stderr.
            if let Some(failure) = err.downcast_ref::<ToolFailure>() {
                debug!(err = %format!("{err:#}"), "launch aborted");
                return ExitCode::from(exit_status_byte(failure.exit_code()));
            }
            eprintln!("qemu-runner: {err:#}");
            ExitCode::from(exit_status_byte(exit_codes::FAILURE))
        }
    }
}

/// Exit codes outside `0..=255` cannot be reported as-is.
fn exit_status_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(exit_codes::FAILURE as u8)
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => load_config(path)
            .context("load launcher config")?
            .plan_settings(),
        None => PlanSettings::default(),
    };
    let params = cli.run_parameters();

    if cli.dry_run {
        let plan = build_plan(&params, &settings);
        for invocation in plan.invocations() {
            println!("{invocation}");
        }
        return Ok(());
    }

    launch(&params, &settings, &SystemRunner)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["qemu-runner", "kernel.elf"]);
        assert_eq!(cli.run_parameters(), RunParameters::new("kernel.elf"));
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn parse_all_options() {
        let cli = Cli::parse_from([
            "qemu-runner",
            "out/moss.elf",
            "--init",
            "/usr/bin/myinit",
            "--rootfs",
            "disk.img",
            "--cpu",
            "cortex-a57",
            "--smp",
            "2",
            "--memory",
            "1G",
            "--debug",
        ]);
        assert_eq!(
            cli.run_parameters(),
            RunParameters {
                executable_path: "out/moss.elf".to_string(),
                init_path: "/usr/bin/myinit".to_string(),
                rootfs_path: "disk.img".to_string(),
                cpu_model: "cortex-a57".to_string(),
                core_count: 2,
                memory_size: "1G".to_string(),
                debug_enabled: true,
            }
        );
    }

    #[test]
    fn executable_is_required_and_non_empty() {
        assert!(Cli::try_parse_from(["qemu-runner"]).is_err());
        assert!(Cli::try_parse_from(["qemu-runner", ""]).is_err());
    }

    #[test]
    fn smp_must_be_unsigned_integer() {
        assert!(Cli::try_parse_from(["qemu-runner", "k.elf", "--smp", "four"]).is_err());
        assert!(Cli::try_parse_from(["qemu-runner", "k.elf", "--smp", "-1"]).is_err());
    }

    #[test]
    fn out_of_range_exit_code_maps_to_failure() {
        assert_eq!(exit_status_byte(300), 1);
        assert_eq!(exit_status_byte(-2), 1);
        assert_eq!(exit_status_byte(7), 7);
    }
}
