//! Synthesis of the converter and emulator invocations for a launch.

use crate::core::artifact::derive_binary_path;
use crate::core::init_args::kernel_command_line;
use crate::core::options::{OptionEntry, OptionTable, flatten};
use crate::core::types::{Invocation, RunParameters, Tool};

pub const DEFAULT_CONVERTER: &str = "aarch64-none-elf-objcopy";
pub const DEFAULT_EMULATOR: &str = "qemu-system-aarch64";
/// Emulated board: the generic ARM `virt` machine with a GICv3.
pub const MACHINE: &str = "virt,gic-version=3";
/// Flag that halts the emulated CPU at startup until a debugger continues it.
pub const STOP_AT_STARTUP_FLAG: &str = "-S";

/// Tool programs and extra emulator options used when building a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSettings {
    pub converter_program: String,
    pub emulator_program: String,
    /// Applied after the base template: existing flags are replaced in place,
    /// new flags are appended.
    pub extra_options: Vec<OptionEntry>,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            converter_program: DEFAULT_CONVERTER.to_string(),
            emulator_program: DEFAULT_EMULATOR.to_string(),
            extra_options: Vec::new(),
        }
    }
}

/// Both invocations of a launch, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub binary_path: String,
    pub convert: Invocation,
    pub emulate: Invocation,
}

impl LaunchPlan {
    pub fn invocations(&self) -> [&Invocation; 2] {
        [&self.convert, &self.emulate]
    }
}

/// `<converter> -O binary <executable> <binary>`.
pub fn converter_invocation(program: &str, executable_path: &str, binary_path: &str) -> Invocation {
    Invocation::new(
        Tool::Converter,
        vec![
            program.to_string(),
            "-O".to_string(),
            "binary".to_string(),
            executable_path.to_string(),
            binary_path.to_string(),
        ],
    )
}

/// Emulator options for `params`, booting `binary_path`.
///
/// Base template order: `-M -initrd -cpu -m -smp -nographic -s -kernel -append`,
/// then `-S` when debugging, then `extra_options`.
pub fn emulator_option_table(
    params: &RunParameters,
    binary_path: &str,
    extra_options: &[OptionEntry],
) -> OptionTable {
    let mut table = OptionTable::new();
    table.set("-M", MACHINE);
    table.set("-initrd", params.rootfs_path.as_str());
    table.set("-cpu", params.cpu_model.as_str());
    table.set("-m", params.memory_size.as_str());
    table.set("-smp", params.core_count.to_string());
    table.flag("-nographic");
    // gdb server on tcp::1234
    table.flag("-s");
    table.set("-kernel", binary_path);
    table.set("-append", kernel_command_line(&params.init_path));

    if params.debug_enabled {
        table.flag(STOP_AT_STARTUP_FLAG);
    }

    for option in extra_options {
        table.insert(option.key.as_str(), option.value.clone());
    }
    table
}

pub fn emulator_invocation(
    program: &str,
    params: &RunParameters,
    binary_path: &str,
    extra_options: &[OptionEntry],
) -> Invocation {
    let table = emulator_option_table(params, binary_path, extra_options);
    Invocation::new(Tool::Emulator, flatten(program, &table))
}

/// Build the full launch plan. Pure: identical inputs give identical plans.
pub fn build_plan(params: &RunParameters, settings: &PlanSettings) -> LaunchPlan {
    let binary_path = derive_binary_path(&params.executable_path);
    let convert = converter_invocation(
        &settings.converter_program,
        &params.executable_path,
        &binary_path,
    );
    let emulate = emulator_invocation(
        &settings.emulator_program,
        params,
        &binary_path,
        &settings.extra_options,
    );
    LaunchPlan {
        binary_path,
        convert,
        emulate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_APPEND: &str = "--init=/bin/sh --init-arg=-i --rootfs=ext4fs \
        --automount=/dev,devfs --automount=/tmp,tmpfs --automount=/proc,procfs \
        --automount=/sys,sysfs";

    fn default_plan(params: &RunParameters) -> LaunchPlan {
        build_plan(params, &PlanSettings::default())
    }

    #[test]
    fn default_plan_matches_expected_argv() {
        let plan = default_plan(&RunParameters::new("kernel.elf"));

        assert_eq!(plan.binary_path, "kernel.bin");
        assert_eq!(
            plan.convert.argv,
            vec![
                "aarch64-none-elf-objcopy",
                "-O",
                "binary",
                "kernel.elf",
                "kernel.bin"
            ]
        );
        assert_eq!(
            plan.emulate.argv,
            vec![
                "qemu-system-aarch64",
                "-M",
                "virt,gic-version=3",
                "-initrd",
                "moss.img",
                "-cpu",
                "cortex-a72",
                "-m",
                "2G",
                "-smp",
                "4",
                "-nographic",
                "-s",
                "-kernel",
                "kernel.bin",
                "-append",
                DEFAULT_APPEND,
            ]
        );
        assert!(!plan.emulate.argv.iter().any(|token| token == "-S"));
    }

    #[test]
    fn debug_appends_stop_flag_after_base_template() {
        let mut params = RunParameters::new("kernel.elf");
        params.init_path = "/usr/bin/myinit".to_string();
        params.debug_enabled = true;

        let argv = default_plan(&params).emulate.argv;
        let n = argv.len();
        assert_eq!(argv[n - 3], "-append");
        assert_eq!(
            argv[n - 2],
            "--init=/usr/bin/myinit --rootfs=ext4fs --automount=/dev,devfs \
             --automount=/tmp,tmpfs --automount=/proc,procfs --automount=/sys,sysfs"
        );
        assert_eq!(argv[n - 1], "-S");
        assert_eq!(argv.iter().filter(|token| *token == "-S").count(), 1);
    }

    #[test]
    fn parameters_flow_into_options() {
        let params = RunParameters {
            executable_path: "out/moss.elf".to_string(),
            init_path: "/bin/bash".to_string(),
            rootfs_path: "disk.img".to_string(),
            cpu_model: "cortex-a57".to_string(),
            core_count: 1,
            memory_size: "512M".to_string(),
            debug_enabled: false,
        };
        let table = emulator_option_table(&params, "out/moss.bin", &[]);

        let value = |key: &str| table.get(key).and_then(|entry| entry.value.clone());
        assert_eq!(value("-initrd").as_deref(), Some("disk.img"));
        assert_eq!(value("-cpu").as_deref(), Some("cortex-a57"));
        assert_eq!(value("-m").as_deref(), Some("512M"));
        assert_eq!(value("-smp").as_deref(), Some("1"));
        assert_eq!(value("-kernel").as_deref(), Some("out/moss.bin"));
        assert!(
            value("-append")
                .expect("append")
                .starts_with("--init=/bin/bash --init-arg=-i ")
        );
    }

    #[test]
    fn key_order_is_stable_across_builds() {
        let mut params = RunParameters::new("kernel.elf");
        params.debug_enabled = true;
        let first = emulator_option_table(&params, "kernel.bin", &[]);
        let second = emulator_option_table(&params, "kernel.bin", &[]);

        let keys: Vec<&str> = first.keys().collect();
        assert_eq!(
            keys,
            vec![
                "-M",
                "-initrd",
                "-cpu",
                "-m",
                "-smp",
                "-nographic",
                "-s",
                "-kernel",
                "-append",
                "-S"
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn extra_options_override_in_place_and_append_new() {
        let settings = PlanSettings {
            extra_options: vec![
                OptionEntry {
                    key: "-m".to_string(),
                    value: Some("4G".to_string()),
                },
                OptionEntry {
                    key: "-serial".to_string(),
                    value: Some("mon:stdio".to_string()),
                },
            ],
            ..PlanSettings::default()
        };
        let argv = build_plan(&RunParameters::new("kernel.elf"), &settings)
            .emulate
            .argv;

        assert_eq!(&argv[7..9], ["-m", "4G"]);
        assert_eq!(argv.iter().filter(|token| *token == "-m").count(), 1);
        assert_eq!(&argv[argv.len() - 2..], ["-serial", "mon:stdio"]);
    }

    #[test]
    fn custom_programs_lead_each_invocation() {
        let settings = PlanSettings {
            converter_program: "llvm-objcopy".to_string(),
            emulator_program: "/opt/qemu/bin/qemu-system-aarch64".to_string(),
            extra_options: Vec::new(),
        };
        let plan = build_plan(&RunParameters::new("kernel.elf"), &settings);
        assert_eq!(plan.convert.program(), "llvm-objcopy");
        assert_eq!(plan.emulate.program(), "/opt/qemu/bin/qemu-system-aarch64");
        assert_eq!(plan.convert.tool, Tool::Converter);
        assert_eq!(plan.emulate.tool, Tool::Emulator);
    }
}
