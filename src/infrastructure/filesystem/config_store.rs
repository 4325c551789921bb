use std::path::{Path, PathBuf};

use crate::common::error::SrcinitError;
use crate::common::result::{ResultExt, SrcinitResult};
use crate::domain::entities::settings::ConfigFile;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "srcinit.yaml";

/// Loads `srcinit.yaml`
pub struct ConfigStore;

impl ConfigStore {
    /// `$XDG_CONFIG_HOME/srcinit/srcinit.yaml`, or the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
            .or_else(dirs::config_dir)?;
        Some(config_dir.join("srcinit").join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// An explicitly named file must exist. The default file is optional and
    /// an empty configuration is returned when it is absent.
    pub fn load(explicit: Option<&Path>) -> SrcinitResult<ConfigFile> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(ConfigFile::default()),
            },
        }
    }

    /// Read and parse a configuration file
    pub fn read(path: &Path) -> SrcinitResult<ConfigFile> {
        let content = std::fs::read_to_string(path)
            .with_config_error("failed to read configuration file", Some(path.to_path_buf()))?;
        Self::parse(&content, Some(path))
    }

    /// Parse configuration text. Empty text is an empty configuration.
    pub fn parse(content: &str, path: Option<&Path>) -> SrcinitResult<ConfigFile> {
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            SrcinitError::config_error_with_source(
                "invalid configuration file",
                path.map(Path::to_path_buf),
                e,
            )
        })
    }
}
