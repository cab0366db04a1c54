use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_EXTENSIONS: &[&str] = &["php", "inc"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct LintConfig {
    pub fix: Option<bool>,
    pub format: Option<OutputFormat>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl LintConfig {
    /// Look for lint settings in `directory`.
    ///
    /// Reads the `lint` key of `deka.json` first and falls back to a
    /// standalone `lint.toml`. Unreadable or malformed files are logged and
    /// skipped.
    pub fn load(directory: &Path) -> Self {
        let deka_json_path = directory.join("deka.json");
        if let Some(config) = load_lint_from_deka_json(&deka_json_path) {
            return config;
        }

        let toml_path = directory.join("lint.toml");
        if !toml_path.exists() {
            return Self::default();
        }
        match Self::from_toml_file(&toml_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}");
                Self::default()
            }
        }
    }

    /// Load an explicitly requested config file. Errors are not swallowed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
            return Self::from_toml_file(path);
        }
        let root = read_json(path)?;
        let section = root.get("lint").cloned().unwrap_or(root);
        serde_json::from_value(section).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = read_to_string(path)?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(extensions) if !extensions.is_empty() => extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            _ => DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.exclude
            .iter()
            .flatten()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}

fn load_lint_from_deka_json(path: &Path) -> Option<LintConfig> {
    if !path.exists() {
        return None;
    }

    let root = match read_json(path) {
        Ok(root) => root,
        Err(err) => {
            tracing::warn!("{err}");
            return None;
        }
    };

    let lint = root.get("lint")?;
    match serde_json::from_value::<LintConfig>(lint.clone()) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("Failed to parse {}.lint: {}", path.display(), err);
            None
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<serde_json::Value, ConfigError> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
