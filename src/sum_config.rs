use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_DIGITS: usize = 7;
pub const MAX_DIGITS: usize = 22;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file: {0}")]
    Read(#[from] io::Error),
    #[error("Error parsing config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid digit count {0}, expected 1..={}", MAX_DIGITS)]
    InvalidDigits(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct InputSettings {
    /// `NA` tokens become NaN when set, otherwise they are rejected
    pub allow_na: bool
}
impl Default for InputSettings {
    fn default() -> Self {
        Self { allow_na: true }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Significant digits for plain output
    pub digits: usize,
    pub running: bool
}
impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plain,
            digits: DEFAULT_DIGITS,
            running: false
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SumSettings {
    pub input: InputSettings,
    pub output: OutputSettings
}
impl SumSettings {
    pub fn from_toml_slice(contents: &[u8]) -> Result<Self, ConfigError> {
        let settings: SumSettings = toml::from_slice(contents)?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config_file = File::open(path)?;
        let mut config_file_contents = Vec::new();
        config_file.read_to_end(&mut config_file_contents)?;
        Self::from_toml_slice(&config_file_contents)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (1..=MAX_DIGITS).contains(&self.output.digits) {
            Ok(())
        } else {
            Err(ConfigError::InvalidDigits(self.output.digits))
        }
    }
}
