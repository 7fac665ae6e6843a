//! Interpreter configuration.
//!
//! Layered with figment, lowest priority first:
//!
//! 1. built-in defaults
//! 2. `daqmx.toml` in the working directory (or an explicit file)
//! 3. `DAQMX_` environment variables (`DAQMX_LIBRARY_PATH`,
//!    `DAQMX_MAX_SIZING_ATTEMPTS`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File read by [`InterpreterConfig::load`].
pub const CONFIG_FILE: &str = "daqmx.toml";

/// Settings of the process-wide [`crate::interpreter::Interpreter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Driver library to open. The platform default name when unset.
    pub library_path: Option<PathBuf>,
    /// Probe/read cycles tried on a variable-size attribute before giving
    /// up with [`Error::BufferChurn`].
    pub max_sizing_attempts: u32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            max_sizing_attempts: 3,
        }
    }
}

impl InterpreterConfig {
    /// Loads defaults, then `daqmx.toml`, then the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Like [`InterpreterConfig::load`] with an explicit file. A missing
    /// file contributes nothing.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("DAQMX_").only(&["library_path", "max_sizing_attempts"]))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_sizing_attempts == 0 {
            return Err(Error::Config(
                "max_sizing_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The library to open.
    #[must_use]
    pub fn library_path(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(daqmx_sys::DEFAULT_LIBRARY_NAME))
    }
}
