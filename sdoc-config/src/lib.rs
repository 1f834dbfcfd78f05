//! Shared configuration loader for the sdoc toolchain.
//!
//! `defaults/sdoc.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`SdocConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use sdoc_babel::common::table::TableGeometry;
use sdoc_babel::context::ConvertOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/sdoc.default.toml");

/// Top-level configuration consumed by sdoc applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SdocConfig {
    pub convert: ConvertConfig,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

/// Converter tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub table_width: u32,
    pub row_min_height: u32,
    pub image_width_inches: f32,
    pub callout_color: String,
    pub last_modify_user: String,
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            table: TableGeometry {
                width: config.table_width,
                row_min_height: config.row_min_height,
            },
            image_width_inches: config.image_width_inches,
            callout_color: config.callout_color.clone(),
        }
    }
}

/// Where images live and how their URLs are built.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    pub service_url: String,
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl SdocConfig {
    /// Converter options for the library.
    pub fn to_convert_options(&self) -> ConvertOptions {
        ConvertOptions::from(&self.convert)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a CLI flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<SdocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<SdocConfig, ConfigError> {
    Loader::new().build()
}
