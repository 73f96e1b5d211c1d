//! Configuration for the parser and the line-oriented CLI.
//!
//! The defaults live in `defaults/ofjson.default.toml`, compiled in with
//! `include_str!`. A [`Loader`] stacks a user file and command line flags
//! over them.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/ofjson.default.toml");

/// Nesting limit used when no configuration is loaded.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OfJsonConfig {
    pub parser: ParserOptions,
    pub input: InputConfig,
}

/// Knobs consumed by the parsers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParserOptions {
    /// Deepest accepted action nesting; deeper input fails with
    /// [`crate::ParseError::TooDeep`].
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// How the CLI treats its input stream.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub skip_reply_headers: bool,
    pub fail_fast: bool,
}

/// Builds an [`OfJsonConfig`] from the embedded TOML plus anything the
/// caller stacks on top. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Stack a user TOML file. It must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        let file = File::from(path.as_ref()).format(FileFormat::Toml);
        Self {
            builder: self.builder.add_source(file.required(true)),
        }
    }

    /// `--fail-fast` on the command line
    pub fn fail_fast(self, enabled: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            builder: self.builder.set_override("input.fail_fast", enabled)?,
        })
    }

    pub fn max_depth(self, limit: usize) -> Result<Self, ConfigError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(Self {
            builder: self.builder.set_override("parser.max_depth", limit)?,
        })
    }

    pub fn build(self) -> Result<OfJsonConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl OfJsonConfig {
    /// The embedded defaults alone.
    pub fn embedded() -> Result<Self, ConfigError> {
        Loader::new().build()
    }
}
