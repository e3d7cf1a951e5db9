//! Wiki configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, WikiError};

/// Name of the optional configuration file in the wiki base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Main wiki configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Site title shown in the layout header
    pub title: String,

    // Directories, relative to the base directory
    pub pages_dir: String,
    pub templates_dir: String,
    pub static_dir: String,

    /// Port the server listens on unless overridden on the command line
    pub port: u16,

    /// Highlight fenced code blocks with a known language
    pub highlight: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            title: "Wiki".to_string(),
            pages_dir: "pages".to_string(),
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            port: 8080,
            highlight: true,
        }
    }
}

impl WikiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| WikiError::io(path, e))?;
        let config: WikiConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `_config.yml` from the base directory, falling back to defaults
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let path = base_dir.as_ref().join(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
