//! Configuration loading with multi-layer merge

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level skylogix configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkylogixConfig {
    /// Where the records live
    #[serde(default)]
    pub database: DatabaseConfig,

    /// How results are shown
    #[serde(default)]
    pub output: OutputConfig,
}

const DEFAULT_DATABASE_PATH: &str = "skylogix.db";
const DEFAULT_FORMAT: &str = "console";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite file path, `~` is expanded
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// console, json or quiet
    pub format: Option<String>,

    /// Append logs to this file as well as stderr
    pub log_file: Option<String>,
}

impl SkylogixConfig {
    /// Load configuration from the standard hierarchy
    ///
    /// Load order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. ~/.config/skylogix/config.toml
    /// 3. .skylogix/config.toml (project)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                let user_config = Self::load_file(&user_config_path)
                    .with_context(|| format!("loading {}", user_config_path.display()))?;
                config.merge(user_config);
            }
        }

        let project_config_path = project_dir
            .map(|p| p.join(".skylogix/config.toml"))
            .unwrap_or_else(|| PathBuf::from(".skylogix/config.toml"));

        if project_config_path.exists() {
            let project_config = Self::load_file(&project_config_path)
                .with_context(|| format!("loading {}", project_config_path.display()))?;
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Get the user config path (~/.config/skylogix/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skylogix/config.toml"))
    }

    /// Merge another config into this one (other takes precedence where set)
    pub fn merge(&mut self, other: Self) {
        if other.database.path.is_some() {
            self.database.path = other.database.path;
        }
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.log_file.is_some() {
            self.output.log_file = other.output.log_file;
        }
    }

    pub fn output_format(&self) -> &str {
        self.output.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// Database path with `~` expanded; relative paths resolve against `base`
    pub fn database_path(&self, base: Option<&Path>) -> PathBuf {
        expand_path(
            self.database.path.as_deref().unwrap_or(DEFAULT_DATABASE_PATH),
            base,
        )
    }

    pub fn log_file(&self, base: Option<&Path>) -> Option<PathBuf> {
        self.output
            .log_file
            .as_deref()
            .map(|path| expand_path(path, base))
    }
}

fn expand_path(raw: &str, base: Option<&Path>) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    match base {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}
