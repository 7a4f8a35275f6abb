//! Configuration file support for CommitLens
//!
//! Loads dashboard settings from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.commitlensrc.json` in the working directory
//! 3. `commitlens.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::api::DEFAULT_BASE_URL;
use crate::html::DEFAULT_TECHNICAL_PREVIEW;
use crate::notify::DEFAULT_TTL;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEFRAME: &str = "week";

/// Config file names, in discovery order
const CONFIG_FILE_NAMES: &[&str] = &[".commitlensrc.json", "commitlens.config.json"];

/// CommitLens configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Analysis backend base URL (default: http://127.0.0.1:5000)
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Toast lifetime in milliseconds (default: 3000)
    #[serde(default)]
    pub notification_ttl_ms: Option<u64>,

    /// Files listed per file type on the technical tab (default: 5)
    #[serde(default)]
    pub technical_preview_limit: Option<usize>,

    /// Timeframe used when none is given (default: "week")
    #[serde(default)]
    pub default_timeframe: Option<String>,
}

/// Fully resolved configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub notification_ttl: Duration,
    pub technical_preview_limit: usize,
    pub default_timeframe: String,

    /// Path the config was loaded from, if any
    pub config_path: Option<PathBuf>,
}

impl DashboardConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api_base_url {
            validate_base_url(url)?;
        }
        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if self.notification_ttl_ms == Some(0) {
            anyhow::bail!("notification_ttl_ms must be positive");
        }
        if self.technical_preview_limit == Some(0) {
            anyhow::bail!("technical_preview_limit must be positive");
        }
        if let Some(timeframe) = &self.default_timeframe {
            if timeframe.trim().is_empty() {
                anyhow::bail!("default_timeframe must not be empty");
            }
        }
        Ok(())
    }

    /// Resolve config, filling in defaults
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        Ok(ResolvedConfig {
            api_base_url: self
                .api_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(
                self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            notification_ttl: self
                .notification_ttl_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TTL),
            technical_preview_limit: self
                .technical_preview_limit
                .unwrap_or(DEFAULT_TECHNICAL_PREVIEW),
            default_timeframe: self
                .default_timeframe
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string()),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        DashboardConfig::default().resolve()
    }

    /// Override the backend URL (from `--api`)
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self> {
        validate_base_url(url).context("invalid --api value")?;
        self.api_base_url = url.to_string();
        Ok(self)
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("api_base_url must not be empty");
    }
    let parsed = Url::parse(url).with_context(|| format!("api_base_url is not a URL: {}", url))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("api_base_url must use http or https (got {})", other),
    }
}

/// Discover and load a config file from the given directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(DashboardConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<DashboardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: DashboardConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (DashboardConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let resolved = ResolvedConfig::defaults().expect("default config should resolve");
        assert_eq!(resolved.api_base_url, "http://127.0.0.1:5000");
        assert_eq!(resolved.request_timeout, Duration::from_secs(30));
        assert_eq!(resolved.notification_ttl, Duration::from_millis(3000));
        assert_eq!(resolved.technical_preview_limit, 5);
        assert_eq!(resolved.default_timeframe, "week");
        assert!(resolved.config_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "api_base_url": "https://lens.internal:8443",
            "request_timeout_secs": 120,
            "notification_ttl_ms": 5000,
            "technical_preview_limit": 10,
            "default_timeframe": "month"
        }"#;
        let config: DashboardConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.api_base_url, "https://lens.internal:8443");
        assert_eq!(resolved.request_timeout, Duration::from_secs(120));
        assert_eq!(resolved.notification_ttl, Duration::from_millis(5000));
        assert_eq!(resolved.technical_preview_limit, 10);
        assert_eq!(resolved.default_timeframe, "month");
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<DashboardConfig, _> = serde_json::from_str(r#"{"api_url": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_invalid_urls() {
        for url in ["", "not a url", "ftp://example.com"] {
            let config = DashboardConfig {
                api_base_url: Some(url.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{:?} should be rejected", url);
        }
    }

    #[test]
    fn test_reject_zero_values() {
        let config: DashboardConfig = serde_json::from_str(r#"{"request_timeout_secs": 0}"#).unwrap();
        assert!(config.validate().is_err());
        let config: DashboardConfig = serde_json::from_str(r#"{"notification_ttl_ms": 0}"#).unwrap();
        assert!(config.validate().is_err());
        let config: DashboardConfig =
            serde_json::from_str(r#"{"technical_preview_limit": 0}"#).unwrap();
        assert!(config.validate().is_err());
        let config: DashboardConfig = serde_json::from_str(r#"{"default_timeframe": " "}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".commitlensrc.json");
        fs::write(&config_path, r#"{"default_timeframe": "month"}"#).unwrap();

        let (config, path) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.default_timeframe.as_deref(), Some("month"));
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".commitlensrc.json"),
            r#"{"technical_preview_limit": 3}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("commitlens.config.json"),
            r#"{"technical_preview_limit": 8}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.technical_preview_limit,
            Some(3),
            ".commitlensrc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("commitlens.config.json");
        fs::write(&config_path, r#"{"request_timeout_secs": 0}"#).unwrap();

        let err = discover_config(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("commitlens.config.json"));
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"api_base_url": "http://10.0.0.5:5000"}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.api_base_url, "http://10.0.0.5:5000");
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_cli_url_overrides_file() {
        let resolved = ResolvedConfig::defaults()
            .unwrap()
            .with_api_base_url("http://localhost:9000")
            .unwrap();
        assert_eq!(resolved.api_base_url, "http://localhost:9000");
        assert!(ResolvedConfig::defaults()
            .unwrap()
            .with_api_base_url("localhost")
            .is_err());
    }
}
