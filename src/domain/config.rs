use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the item registry.
///
/// Every setting has a default, so an absent or empty configuration file is
/// equivalent to no configuration at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The file items are persisted to.
    ///
    /// Relative paths are resolved against the current working directory.
    store: PathBuf,

    /// Whether the console is cleared before the menu is drawn.
    pub clear_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: default_store(),
            clear_screen: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Returns the path of the item file.
    #[must_use]
    pub fn store(&self) -> &Path {
        &self.store
    }

    /// Sets the path of the item file.
    pub fn set_store(&mut self, path: PathBuf) {
        self.store = path;
    }
}

fn default_store() -> PathBuf {
    PathBuf::from("items.txt")
}

const fn default_clear_screen() -> bool {
    true
}

/// Errors that can occur when loading or saving the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
    /// The configuration file is not valid TOML for this version.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_store")]
        store: PathBuf,

        #[serde(default = "default_clear_screen")]
        clear_screen: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                store,
                clear_screen,
            } => Self {
                store,
                clear_screen,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            store: config.store,
            clear_screen: config.clear_screen,
        }
    }
}
