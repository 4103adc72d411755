use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SinkKind
// ---------------------------------------------------------------------------

/// Which store a finished ritual is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// JSON array of birth records.
    Responses,
    /// CSV log of birth records with their fortunes.
    Results,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_responses_file")]
    pub responses_file: String,
    #[serde(default = "default_results_file")]
    pub results_file: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkKind>,
    /// Site root used in share text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_origin: Option<String>,
}

fn default_data_dir() -> String {
    paths::DEFAULT_DATA_DIR.to_string()
}

fn default_responses_file() -> String {
    paths::DEFAULT_RESPONSES_FILE.to_string()
}

fn default_results_file() -> String {
    paths::DEFAULT_RESULTS_FILE.to_string()
}

fn default_assets_dir() -> String {
    paths::DEFAULT_ASSETS_DIR.to_string()
}

fn default_sinks() -> Vec<SinkKind> {
    vec![SinkKind::Responses]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            responses_file: default_responses_file(),
            results_file: default_results_file(),
            assets_dir: default_assets_dir(),
            sinks: default_sinks(),
            share_origin: None,
        }
    }
}

impl Config {
    /// Load `destiny.yaml` from `root`; a missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn responses_path(&self, root: &Path) -> PathBuf {
        paths::data_dir(root, &self.data_dir).join(&self.responses_file)
    }

    pub fn results_path(&self, root: &Path) -> PathBuf {
        paths::data_dir(root, &self.data_dir).join(&self.results_file)
    }

    pub fn assets_path(&self, root: &Path) -> PathBuf {
        root.join(&self.assets_dir)
    }

    pub fn share_origin(&self) -> &str {
        self.share_origin.as_deref().unwrap_or("")
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.sinks.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no sinks configured: finished rituals will not be stored".to_string(),
            });
        }

        let mut seen = Vec::new();
        for sink in &self.sinks {
            if seen.contains(sink) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("sink '{sink:?}' listed more than once"),
                });
            }
            seen.push(*sink);
        }

        if self.responses_file == self.results_file {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "responses_file and results_file both point at '{}'",
                    self.responses_file
                ),
            });
        }

        if let Some(origin) = &self.share_origin {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("share_origin '{origin}' is not an http(s) URL"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
