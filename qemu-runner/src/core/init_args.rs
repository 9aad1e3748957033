//! Init-program policy and kernel command line composition.

/// Final path segments treated as interactive shells.
pub const RECOGNIZED_SHELLS: [&str; 2] = ["bash", "sh"];

/// Argument passed to a shell init so it starts interactively.
pub const INTERACTIVE_FLAG: &str = "-i";

/// Root filesystem type declared on the kernel command line.
pub const ROOTFS_TYPE: &str = "ext4fs";

/// Pseudo-filesystems mounted at boot, as `(mount point, filesystem)` in command line order.
pub const AUTOMOUNTS: [(&str, &str); 4] = [
    ("/dev", "devfs"),
    ("/tmp", "tmpfs"),
    ("/proc", "procfs"),
    ("/sys", "sysfs"),
];

/// Whether the last `/`-separated segment of `init_path` is a recognized shell.
///
/// Exact, case-sensitive match; symlinks are not resolved.
pub fn is_interactive_shell(init_path: &str) -> bool {
    let name = init_path.rsplit('/').next().unwrap_or(init_path);
    RECOGNIZED_SHELLS.contains(&name)
}

/// Kernel command line fragment selecting the init program.
pub fn init_fragment(init_path: &str) -> String {
    if is_interactive_shell(init_path) {
        format!("--init={init_path} --init-arg={INTERACTIVE_FLAG}")
    } else {
        format!("--init={init_path}")
    }
}

/// Full kernel command line: init fragment, root filesystem type, then automounts.
pub fn kernel_command_line(init_path: &str) -> String {
    let mut cmdline = init_fragment(init_path);
    cmdline.push_str(" --rootfs=");
    cmdline.push_str(ROOTFS_TYPE);
    for (mount_point, fs) in AUTOMOUNTS {
        cmdline.push_str(&format!(" --automount={mount_point},{fs}"));
    }
    cmdline
}
