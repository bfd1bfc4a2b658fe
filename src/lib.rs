//! YAML Fragments - reusable, parameterized YAML templates
//!
//! Resolves `${opt:name}` / `${self:name}` placeholders (with optional
//! defaults) and splices in other files with `${tfile:path[:name=value,...]}`
//! directives, then parses the result as YAML.
//!
//! # Example
//!
//! ```rust
//! use yaml_fragments::{resolve, Params};
//!
//! let mut params = Params::new();
//! params.insert("stage".to_string(), "prod".to_string());
//!
//! let text = resolve(".", "name: api-${opt:stage}\nlog: ${opt:level, info}", &params).unwrap();
//! assert_eq!(text, "name: api-prod\nlog: info");
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod observer;
pub mod output;
pub mod parser;
pub mod template;

pub use codec::CodecError;
pub use config::{params_from_args, ConfigError, FragmentsConfig, LoadConfig};
pub use error::ResolveError;
pub use observer::{LogObserver, NoopObserver, ResolveEvent, ResolveObserver};
pub use parser::{Params, ScanOptions, Token, TokenType};
pub use template::{FsSource, MemorySource, ResolutionContext, Resolver, TemplateSource};

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a template file
#[derive(Debug, Error)]
pub enum LoadError {
    /// The root template could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Error during resolution
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resolved text is not valid YAML
    #[error("resolved template is not valid YAML: {0}")]
    Codec(#[from] CodecError),

    /// A generated file could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl LoadError {
    /// Format the error, with source context where available
    pub fn format(&self) -> String {
        match self {
            LoadError::Resolve(err) => err.format(),
            other => other.to_string(),
        }
    }
}

/// Result of [`load_with_config`]
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Fully resolved template text
    pub text: String,
    /// The text parsed as YAML
    pub value: serde_yaml::Value,
}

/// Resolve placeholders and directives in `text`, loading includes from disk
/// relative to `base_dir`.
pub fn resolve(
    base_dir: impl AsRef<Path>,
    text: &str,
    params: &Params,
) -> Result<String, ResolveError> {
    Resolver::default()
        .with_observer(&NoopObserver)
        .resolve_tokens_recursive(base_dir.as_ref(), text, params)
}

/// Load a template file, resolve it and parse it as YAML
pub fn load(path: impl AsRef<Path>, params: &Params) -> Result<serde_yaml::Value, LoadError> {
    let config = LoadConfig::new().with_params(params.clone());
    load_with_config(path, &config).map(|loaded| loaded.value)
}

/// Load a template file with custom configuration
pub fn load_with_config(path: impl AsRef<Path>, config: &LoadConfig) -> Result<Loaded, LoadError> {
    let resolver = Resolver::default().with_options(config.scan);
    load_with_resolver(path.as_ref(), config, &resolver)
}

/// Load a template file through a caller-provided resolver (custom source or observer)
pub fn load_with_resolver(
    path: &Path,
    config: &LoadConfig,
    resolver: &Resolver<'_>,
) -> Result<Loaded, LoadError> {
    let content = resolver
        .source()
        .read(path)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    resolver.observer().on_event(&ResolveEvent::Processing {
        path,
        params: &config.params,
    });
    let text = resolver.resolve_file_contents(path, &content, &config.params)?;

    if config.debug {
        tracing::debug!("Resolved {}:\n{}", path.display(), output::annotate_lines(&text));
    }
    if let Some(out) = &config.annotated_output {
        output::write_annotated(out, &text).map_err(|source| LoadError::Write {
            path: out.clone(),
            source,
        })?;
    }
    if let Some(out) = &config.output {
        output::write_generated(out, &text).map_err(|source| LoadError::Write {
            path: out.clone(),
            source,
        })?;
    }

    let value = codec::parse_yaml(&text)?;
    Ok(Loaded { text, value })
}

/// Dump a YAML tree to text
pub fn dump(value: &serde_yaml::Value) -> Result<String, CodecError> {
    codec::dump_yaml(value)
}
