use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OracleSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EmpireConfig {
    /// sqlx URL; the platform data dir is used when unset.
    pub database_url: Option<String>,
    /// Theme used until the visitor picks one.
    pub prefer_dark: bool,
    pub oracle: OracleSettings,
}

impl EmpireConfig {
    /// Read `path` when given (it must exist), else `empire.toml` in the
    /// platform config dir if present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg = toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("EMPIRE_DATABASE_URL").filter(|s| !s.is_empty()) { self.database_url = Some(url); }
        if let Some(dark) = lookup("EMPIRE_PREFER_DARK").and_then(|s| parse_flag(&s)) { self.prefer_dark = dark; }
        if let Some(model) = lookup("EMPIRE_ORACLE_MODEL").filter(|s| !s.is_empty()) { self.oracle.model = model; }
        if let Some(endpoint) = lookup("EMPIRE_ORACLE_ENDPOINT").filter(|s| !s.is_empty()) { self.oracle.endpoint = endpoint; }
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")).filter(|s| !s.is_empty()) {
            self.oracle.api_key = Some(key);
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "empire", "empire").map(|d| d.config_dir().join("empire.toml"))
}
