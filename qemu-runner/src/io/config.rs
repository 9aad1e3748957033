//! Launcher configuration read from a TOML file passed with `--config`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::core::options::OptionEntry;
use crate::core::plan::{DEFAULT_CONVERTER, DEFAULT_EMULATOR, PlanSettings};

/// Launcher configuration (TOML).
///
/// Missing fields default to the built-in toolchain, so an empty file behaves
/// exactly like running without `--config`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LaunchConfig {
    pub converter: ConverterConfig,
    pub emulator: EmulatorConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Executable that turns the ELF image into a flat binary.
    pub program: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_CONVERTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmulatorConfig {
    pub program: String,
    /// Extra options applied over the base template, in file order.
    pub options: Vec<ExtraOption>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_EMULATOR.to_string(),
            options: Vec::new(),
        }
    }
}

/// `[[emulator.options]]` entry. Omitting `value` yields a no-argument flag.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtraOption {
    pub flag: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl LaunchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.converter.program.trim().is_empty() {
            return Err(anyhow!("converter.program must be non-empty"));
        }
        if self.emulator.program.trim().is_empty() {
            return Err(anyhow!("emulator.program must be non-empty"));
        }
        for (idx, option) in self.emulator.options.iter().enumerate() {
            if option.flag.is_empty() {
                return Err(anyhow!("emulator.options[{idx}].flag must be non-empty"));
            }
            if option.flag.trim() != option.flag {
                return Err(anyhow!(
                    "emulator.options[{idx}].flag {:?} has surrounding whitespace",
                    option.flag
                ));
            }
        }
        Ok(())
    }

    /// Settings consumed by the plan builder.
    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            converter_program: self.converter.program.clone(),
            emulator_program: self.emulator.program.clone(),
            extra_options: self
                .emulator
                .options
                .iter()
                .map(|option| OptionEntry {
                    key: option.flag.clone(),
                    value: option.value.clone(),
                })
                .collect(),
        }
    }
}

/// Parse and validate config from TOML text.
pub fn parse_config(contents: &str) -> Result<LaunchConfig> {
    let cfg: LaunchConfig = toml::from_str(contents).context("parse config toml")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config from a TOML file. Unlike a default lookup, a missing file is an error.
pub fn load_config(path: &Path) -> Result<LaunchConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("load {}", path.display()))
}
