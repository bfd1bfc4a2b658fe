//! Configuration for loading templates
//!
//! A [`LoadConfig`] can be built in code or read from a TOML file:
//!
//! ```toml
//! [params]
//! stage = "prod"
//!
//! [options]
//! trailing_colon = false
//! output = "serverless.yml"
//! annotated_output = "serverless.debug.txt"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::parser::ast::Params;
use crate::parser::ScanOptions;

/// Errors that can occur when loading a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for [`crate::load_with_config`]
#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    /// Parameters visible to the root template
    pub params: Params,
    /// Tokenizer options
    pub scan: ScanOptions,
    /// Where to write the generated companion file
    pub output: Option<PathBuf>,
    /// Where to write the line-numbered copy of the resolved text
    pub annotated_output: Option<PathBuf>,
    /// Log the line-numbered resolved text at debug level
    pub debug: bool,
}

impl LoadConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parameter table
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Set a single parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the tokenizer options
    pub fn with_scan_options(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    /// Write the generated companion file to `path`
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Write a line-numbered copy of the resolved text to `path`
    pub fn with_annotated_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.annotated_output = Some(path.into());
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// TOML structure for config files
#[derive(Debug, Default, Deserialize)]
pub struct FragmentsConfig {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub options: OptionsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionsSection {
    #[serde(default)]
    pub trailing_colon: bool,
    pub output: Option<PathBuf>,
    pub annotated_output: Option<PathBuf>,
    #[serde(default)]
    pub debug: bool,
}

impl FragmentsConfig {
    /// Load config from a TOML file; relative output paths are taken
    /// relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let Some(dir) = path.parent() {
            config.options.output = config.options.output.map(|p| dir.join(p));
            config.options.annotated_output =
                config.options.annotated_output.map(|p| dir.join(p));
        }
        Ok(config)
    }

    /// Load config from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Turn the file contents into a [`LoadConfig`]
    pub fn into_load_config(self) -> LoadConfig {
        LoadConfig {
            params: self.params,
            scan: ScanOptions::new().with_trailing_colon(self.options.trailing_colon),
            output: self.options.output,
            annotated_output: self.options.annotated_output,
            debug: self.options.debug,
        }
    }
}

/// Collect `--name value` pairs from command-line style arguments.
///
/// A value without a preceding `--name`, and a trailing `--name` without a
/// value, are ignored.
pub fn params_from_args<I, S>(args: I) -> Params
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut params = Params::new();
    let mut name: Option<String> = None;
    for arg in args {
        let arg = arg.as_ref();
        if let Some(flag) = arg.strip_prefix("--") {
            name = Some(flag.to_string());
        } else if let Some(name) = name.take() {
            params.insert(name, arg.to_string());
        }
    }
    params
}
