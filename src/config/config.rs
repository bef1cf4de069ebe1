use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the company API.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show a row-number column in the company table
    pub show_row_numbers: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Start with the in-memory store instead of the HTTP API
    pub offline: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self { offline: false }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when
    /// the file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("company-registry").join("config.toml"))
    }

    /// Default config file content with comments, for `--generate-config`.
    pub fn create_default_with_comments() -> String {
        r#"# Company Registry Configuration File
# Location: ~/.config/company-registry/config.toml (Linux/macOS)
#           %APPDATA%\company-registry\config.toml (Windows)

[server]
# Base URL of the company API (COMPANY_API_URL overrides this)
base_url = "http://localhost:3001"

[display]
# Show a row-number column in the company table
show_row_numbers = false

[behavior]
# Start with the in-memory store instead of the HTTP API
offline = false
"#
        .to_string()
    }
}
