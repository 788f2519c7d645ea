//! Configuration management for sbom-fixtures
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Command-line flags (highest priority, applied by the CLI)
//! 2. Environment variables (`SBOM_FIXTURES_` prefix)
//! 3. `./sbom-fixtures.toml` (or the file passed with `--config`)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # sbom-fixtures.toml
//! output_dir = "test-projects"
//! python_version = "3.11"
//! clean = false
//! fail_on_error = true
//! log_format = "json"
//! ```

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::batch::BatchOptions;
use crate::error::FixtureError;
use crate::registry::{GeneratorContext, DEFAULT_PYTHON_VERSION};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "sbom-fixtures.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SBOM_FIXTURES_";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// JSON lines
    Json,
}

/// Complete sbom-fixtures configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    /// Directory receiving the generated projects
    pub output_dir: PathBuf,

    /// Python version named in the pip-tools lock header
    pub python_version: String,

    /// Remove existing project directories before writing
    pub clean: bool,

    /// Exit non-zero when any requested tool fails
    pub fail_on_error: bool,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test-projects"),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            clean: false,
            fail_on_error: false,
            log_format: LogFormat::default(),
        }
    }
}

impl FixturesConfig {
    /// Load configuration from defaults, `sbom-fixtures.toml` and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds invalid values.
    pub fn load() -> Result<Self, FixtureError> {
        Self::figment(Path::new(CONFIG_FILE)).extract().map_err(config_error)
    }

    /// Load configuration from a specific file plus environment
    ///
    /// Unlike [`load`](Self::load), the file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or holds invalid values.
    pub fn load_from(path: &Path) -> Result<Self, FixtureError> {
        if !path.is_file() {
            return Err(FixtureError::Config(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        Self::figment(path).extract().map_err(config_error)
    }

    /// Layered figment: defaults, then `path` if present, then environment
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Generator context derived from this configuration
    #[must_use]
    pub fn generator_context(&self) -> GeneratorContext {
        GeneratorContext {
            python_version: self.python_version.clone(),
        }
    }

    /// Batch options derived from this configuration
    #[must_use]
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            root: self.output_dir.clone(),
            clean: self.clean,
            context: self.generator_context(),
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn config_error(err: figment::Error) -> FixtureError {
    FixtureError::Config(err.to_string())
}
