//! Team name canonicalization.
//!
//! Constructor entries change name with sponsors and engine suppliers
//! ("Racing Point BWT Mercedes", "Aston Martin Aramco Mercedes"). The alias
//! table maps each recorded variant onto one canonical team identity. Names
//! missing from the table are already canonical.
//!
//! A default table is embedded in the crate. A TOML file with the same shape
//! replaces it:
//!
//! ```toml
//! [aliases]
//! "Alfa Romeo Ferrari" = "Kick Sauber"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use pitwall_model::ConfigError;
use serde::Deserialize;
use tracing::{debug, info};

/// Environment variable naming an alias file that replaces the embedded table.
pub const TEAMS_ENV_VAR: &str = "PITWALL_TEAMS_FILE";

/// Default alias table, 2014 to 2024 Formula 1 entries.
pub const EMBEDDED_TEAM_ALIASES: &str = include_str!("../data/team_aliases.toml");

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Variant name to canonical team name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAliasTable {
    aliases: BTreeMap<String, String>,
}

impl TeamAliasTable {
    /// Builds a table, rejecting chains that would make canonicalization
    /// depend on how often it is applied.
    pub fn new(aliases: BTreeMap<String, String>) -> Result<Self, ConfigError> {
        for (alias, canonical) in &aliases {
            if let Some(target) = aliases.get(canonical)
                && target != canonical
            {
                return Err(ConfigError::NonIdempotentAlias {
                    alias: alias.clone(),
                    canonical: canonical.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(Self { aliases })
    }

    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: AliasFile = toml::from_str(text).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        Self::new(file.aliases)
    }

    /// The table shipped with the crate.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_TEAM_ALIASES, "embedded team aliases")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml_str(&text, &path.display().to_string())?;
        info!(path = %path.display(), aliases = table.len(), "loaded team alias table");
        Ok(table)
    }

    /// Loads the table named by [`TEAMS_ENV_VAR`], falling back to the
    /// embedded one.
    pub fn load_default() -> Result<Self, ConfigError> {
        match std::env::var(TEAMS_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => {
                debug!("using embedded team alias table");
                Self::embedded()
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Aliases in variant-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
    }
}

/// Canonical team identity for a recorded team name.
pub fn canonicalize<'a>(name: &'a str, table: &'a TeamAliasTable) -> &'a str {
    table.get(name).unwrap_or(name)
}
