//! Browser configuration.
//!
//! Provides the recipe location, default sort priorities and display
//! settings. Configuration can be loaded from and saved to a TOML file.

use larder_common::{LarderError, LarderResult, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::loader::DEFAULT_RECIPE_PATH;

/// Configuration file name.
const CONFIG_FILE: &str = "larder.toml";

/// Browser configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Config file schema version
    pub version: SchemaVersion,

    // === Data ===
    /// Recipe file or directory
    pub recipe_path: PathBuf,

    // === Sorting ===
    /// Stats prioritized when none are given on the command line
    pub default_priority_stats: Vec<String>,

    // === Display ===
    /// Maximum characters per table cell before truncation
    pub truncate_limit: usize,
    /// Print composition trees under the table
    pub show_trees: bool,

    // === Watch mode ===
    /// Poll interval in milliseconds
    pub watch_interval_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            version: SchemaVersion::CONFIG_FILE,
            recipe_path: PathBuf::from(DEFAULT_RECIPE_PATH),
            default_priority_stats: Vec::new(),
            truncate_limit: 40,
            show_trees: false,
            watch_interval_ms: 1000,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                if let Err(e) = config.check_version() {
                    warn!("Ignoring config file {}: {e}", path.display());
                    return Self::default();
                }
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> LarderResult<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> LarderResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| LarderError::Serialization(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("larder").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Check that this build can read the file's schema version.
    pub fn check_version(&self) -> LarderResult<()> {
        if SchemaVersion::CONFIG_FILE.can_read(&self.version) {
            Ok(())
        } else {
            Err(LarderError::VersionMismatch {
                expected: SchemaVersion::CONFIG_FILE.to_string(),
                actual: self.version.to_string(),
            })
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.truncate_limit = self.truncate_limit.clamp(4, 200);
        self.watch_interval_ms = self.watch_interval_ms.clamp(100, 60_000);

        self.default_priority_stats.retain(|s| !s.trim().is_empty());
        if self.recipe_path.as_os_str().is_empty() {
            self.recipe_path = PathBuf::from(DEFAULT_RECIPE_PATH);
        }
    }
}
