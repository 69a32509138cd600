use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://tfs-product.cmf.criticalmanufacturing.com/Products";
pub const DEFAULT_SLIDE_INDEX: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    pub project: String,
    pub team: String,
    /// Personal access token, sent as the password half of a basic credential.
    pub pat: String,
    pub template_path: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Zero-based index of the slide that receives the backlog.
    #[serde(default = "default_slide_index")]
    pub slide_index: usize,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_slide_index() -> usize {
    DEFAULT_SLIDE_INDEX
}

impl ReviewConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [("project", &self.project), ("team", &self.team), ("pat", &self.pat)] {
            if value.trim().is_empty() {
                bail!("Config key `{key}` must not be empty");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

fn home_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sprint-review")
        .join("config.toml")
}

/// Pick the config file: an explicit path wins, then `config.json` and
/// `config.toml` in the working directory, then the one in the home directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    ["config.json", "config.toml"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .unwrap_or_else(home_config_path)
}

pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<ReviewConfig> {
    let config: ReviewConfig = match format {
        ConfigFormat::Json => serde_json::from_str(contents).context("Failed to parse JSON config")?,
        ConfigFormat::Toml => toml::from_str(contents).context("Failed to parse TOML config")?,
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<ReviewConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents, ConfigFormat::from_path(path))
        .with_context(|| format!("Invalid config in {}", path.display()))
}
