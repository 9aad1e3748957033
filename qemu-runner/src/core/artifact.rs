//! Derivation of the flat binary path from the executable image path.

use tracing::debug;

/// Suffix of the structured executable image.
pub const IMAGE_SUFFIX: &str = ".elf";
/// Suffix of the flat loadable binary produced by the converter.
pub const BINARY_SUFFIX: &str = ".bin";

/// Return the converter output path for `executable_path`.
///
/// The first occurrence of [`IMAGE_SUFFIX`] is removed wherever it appears, then
/// [`BINARY_SUFFIX`] is appended. A path without the image suffix is not rejected:
/// the binary suffix is simply appended to it unchanged.
pub fn derive_binary_path(executable_path: &str) -> String {
    if !executable_path.contains(IMAGE_SUFFIX) {
        debug!(
            executable_path,
            suffix = IMAGE_SUFFIX,
            "executable path has no image suffix"
        );
    }
    let mut binary_path = executable_path.replacen(IMAGE_SUFFIX, "", 1);
    binary_path.push_str(BINARY_SUFFIX);
    binary_path
}
