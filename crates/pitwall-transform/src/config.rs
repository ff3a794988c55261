//! Run configuration file.
//!
//! ```toml
//! teams_file = "teams.toml"
//!
//! [features]
//! rolling_window = 5
//! normalize_delta = true
//! ```

use std::path::{Path, PathBuf};

use pitwall_model::{ConfigError, FeatureOptions};
use serde::{Deserialize, Serialize};

use crate::teams::TeamAliasTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeatureOptions,

    /// Alias file replacing the embedded team table. Relative paths are
    /// resolved against the directory of the configuration file.
    pub teams_file: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        config.features.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text, &path.display().to_string())?;
        if let (Some(teams), Some(dir)) = (&config.teams_file, path.parent())
            && teams.is_relative()
        {
            config.teams_file = Some(dir.join(teams));
        }
        Ok(config)
    }

    /// The configured alias table, or the default one when none is named.
    pub fn team_table(&self) -> Result<TeamAliasTable, ConfigError> {
        match &self.teams_file {
            Some(path) => TeamAliasTable::load(path),
            None => TeamAliasTable::load_default(),
        }
    }
}
