use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a project store.
///
/// Read from `config.toml` in the store root. Every field has a default, so
/// a missing file behaves like an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The name given to the request created for an operation that has no
    /// saved requests yet.
    default_request_name: String,

    /// Whether operations without saved requests get a generated default
    /// request when a project is created or refreshed.
    pub seed_default_requests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_request_name: default_request_name(),
            seed_default_requests: true,
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
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `config.toml` from a store root, falling back to the defaults.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join("config.toml");
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The name used for generated default requests.
    #[must_use]
    pub fn default_request_name(&self) -> &str {
        &self.default_request_name
    }

    /// Sets the name used for generated default requests.
    pub fn set_default_request_name(&mut self, name: String) {
        self.default_request_name = name;
    }
}

fn default_request_name() -> String {
    "Default Request".to_string()
}

const fn default_true() -> bool {
    true
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_request_name")]
        default_request_name: String,

        #[serde(default = "default_true")]
        seed_default_requests: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                default_request_name,
                seed_default_requests,
            } => Self {
                default_request_name,
                seed_default_requests,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            default_request_name: config.default_request_name,
            seed_default_requests: config.seed_default_requests,
        }
    }
}
