//! Tool configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`ScorecardConfig::base_url`].
pub const BASE_URL_ENV: &str = "SCORECARD_BASE_URL";

/// Top-level scorecard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardConfig {
    /// Page address that share links are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written when none are given on the command line.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// PDF page layout.
    #[serde(default)]
    pub page: PageConfig,
}

/// PDF page size and margins, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_width")]
    pub width_mm: f32,
    #[serde(default = "default_height")]
    pub height_mm: f32,
    #[serde(default = "default_margin")]
    pub margin_mm: f32,
    /// TrueType font to embed. The built-in Helvetica has no Hangul glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5173/".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./scorecard-reports")
}
fn default_format() -> String {
    "json,html".to_string()
}
fn default_width() -> f32 {
    210.0
}
fn default_height() -> f32 {
    297.0
}
fn default_margin() -> f32 {
    12.0
}

impl Default for PageConfig {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width_mm: default_width(),
            height_mm: default_height(),
            margin_mm: default_margin(),
            font_path: None,
        }
    }
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            page: PageConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables resolve to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `scorecard.toml` in the current directory
/// 2. `~/.config/scorecard/config.toml`
///
/// `SCORECARD_BASE_URL` overrides the base URL.
pub fn load_config() -> Result<ScorecardConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ScorecardConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("scorecard.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => ScorecardConfig::default(),
    };

    if let Ok(url) = std::env::var(BASE_URL_ENV) {
        config.base_url = url;
    }
    config.base_url = resolve_env_vars(&config.base_url);

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<ScorecardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scorecard"))
}
