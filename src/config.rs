use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Threshold knobs of the budget classifier and the ranker shortlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Budget ratio at or above which a crop is Safe.
    #[serde(default = "default_safe_threshold")]
    pub safe_threshold: f64,
    /// How many alternative crops to return.
    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatasetConfig {
    /// JSON dataset replacing the built-in tables. Empty means built-in.
    #[serde(default)]
    pub path: String,
    /// District rainfall CSV overlay (District, Total_Actual_Rainfall_mm).
    #[serde(default)]
    pub rainfall_csv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dataset_path: Option<String>,
    pub rainfall_csv: Option<String>,
    pub shortlist_size: Option<usize>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/irrigation-oracle/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dataset_path) = overrides.dataset_path {
            self.dataset.path = dataset_path;
        }
        if let Some(rainfall_csv) = overrides.rainfall_csv {
            self.dataset.rainfall_csv = rainfall_csv;
        }
        if let Some(shortlist_size) = overrides.shortlist_size {
            self.engine.shortlist_size = shortlist_size;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_dataset_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.dataset.path)
    }

    pub fn resolved_rainfall_csv_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.dataset.rainfall_csv)
    }

    pub fn default_template() -> String {
        let template = r#"[engine]
safe_threshold = 1.0
shortlist_size = 3

[dataset]
path = ""
rainfall_csv = ""

[server]
host = "127.0.0.1"
port = 3002
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(expand_tilde(trimmed))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safe_threshold: default_safe_threshold(),
            shortlist_size: default_shortlist_size(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_safe_threshold() -> f64 {
    1.0
}

fn default_shortlist_size() -> usize {
    3
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3002
}
