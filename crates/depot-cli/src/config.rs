// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use depot_app::{DEFAULT_PAGE_SIZE, PageWindowMode};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "depot";
const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: &str = "10s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            auth: Auth::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Auth {
    pub issuer: Option<String>,
    pub client_id: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<i64>,
    pub page_window: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE as i64),
            page_window: Some("all".to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("DEPOT_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set DEPOT_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    /// Reads the file (defaults when absent), then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        config.validate(path)?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [api], [auth], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(base_url) = non_empty_env("DEPOT_API_BASE_URL") {
            self.api.base_url = Some(base_url);
        }
        if let Some(token) = non_empty_env("DEPOT_API_TOKEN") {
            self.auth.token = Some(token);
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let base_url = self.base_url();
        Url::parse(base_url).with_context(|| {
            format!(
                "api.base_url {base_url:?} in {} is not a valid URL",
                path.display()
            )
        })?;

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(page_size) = self.ui.page_size
            && page_size <= 0
        {
            bail!(
                "ui.page_size in {} must be positive, got {}",
                path.display(),
                page_size
            );
        }

        if let Some(window) = &self.ui.page_window
            && PageWindowMode::parse(window).is_none()
        {
            bail!(
                "ui.page_window in {} must be \"all\" or \"sliding5\", got {:?}",
                path.display(),
                window
            );
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.token.as_deref()
    }

    pub fn page_size(&self) -> usize {
        self.ui
            .page_size
            .filter(|size| *size > 0)
            .map_or(DEFAULT_PAGE_SIZE, |size| size as usize)
    }

    pub fn page_window(&self) -> PageWindowMode {
        self.ui
            .page_window
            .as_deref()
            .and_then(PageWindowMode::parse)
            .unwrap_or_default()
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# depot config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[auth]\n# Overridden by DEPOT_API_TOKEN when set\n# token = \"...\"\n# issuer = \"https://login.example.com\"\n# client_id = \"depot\"\n\n[ui]\npage_size = {}\n# \"all\" or \"sliding5\"\npage_window = \"all\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_PAGE_SIZE,
        )
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let invalid = || {
        format!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
    };
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value.parse().with_context(invalid)?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value.parse().with_context(invalid)?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value.parse().with_context(invalid)?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!(invalid())
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use depot_app::PageWindowMode;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn clear_api_env() {
        // SAFETY: test-only process-local env mutation, serialized by env_lock.
        unsafe {
            std::env::remove_var("DEPOT_API_BASE_URL");
            std::env::remove_var("DEPOT_API_TOKEN");
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.page_window(), PageWindowMode::All);
        assert_eq!(config.token(), None);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url = \"http://wms\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [auth], and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"https://wms.example.com/gateway/\"\ntimeout = \"2500ms\"\n[auth]\ntoken = \"abc\"\nissuer = \"https://login.example.com\"\n[ui]\npage_size = 50\npage_window = \"sliding5\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "https://wms.example.com/gateway");
        assert_eq!(config.timeout()?, Duration::from_millis(2500));
        assert_eq!(config.token(), Some("abc"));
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.page_window(), PageWindowMode::SLIDING5);
        Ok(())
    }

    #[test]
    fn env_overrides_beat_file_values() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://from-file\"\n[auth]\ntoken = \"file-token\"\n",
        )?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DEPOT_API_BASE_URL", "http://from-env:8080");
            std::env::set_var("DEPOT_API_TOKEN", "env-token");
        }
        let loaded = Config::load(&path);
        clear_api_env();

        let config = loaded?;
        assert_eq!(config.base_url(), "http://from-env:8080");
        assert_eq!(config.token(), Some("env-token"));
        Ok(())
    }

    #[test]
    fn blank_env_override_is_ignored() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[auth]\ntoken = \"file-token\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DEPOT_API_TOKEN", "   ");
        }
        let loaded = Config::load(&path);
        clear_api_env();

        assert_eq!(loaded?.token(), Some("file-token"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn invalid_base_url_is_rejected() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let (_temp, path) = write_config("version = 1\n[api]\nbase_url = \"not a url\"\n")?;
        let error = Config::load(&path).expect_err("bad url should fail");
        assert!(error.to_string().contains("api.base_url"));
        Ok(())
    }

    #[test]
    fn ui_values_are_validated() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size should fail");
        assert!(error.to_string().contains("ui.page_size"));

        let (_temp, path) = write_config("version = 1\n[ui]\npage_window = \"sliding9\"\n")?;
        let error = Config::load(&path).expect_err("unknown window should fail");
        assert!(error.to_string().contains("ui.page_window"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("DEPOT_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("DEPOT_CONFIG_PATH");
        }
        assert_eq!(resolved?, override_path);
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        for raw in ["oops", "10", "5h", "ms", "-3s"] {
            let error = parse_duration(raw).expect_err("invalid duration should fail");
            assert!(error.to_string().contains("invalid duration"), "{raw}: {error}");
        }
        Ok(())
    }

    #[test]
    fn huge_minute_timeout_is_an_error() {
        let raw = format!("{}m", u64::MAX);
        let error = parse_duration(&raw).expect_err("minutes overflow");
        assert!(error.to_string().contains("too large"));
        assert_eq!(
            parse_duration(&format!("{}m", u64::MAX / 60)).map(|duration| duration.as_secs()).ok(),
            Some(u64::MAX / 60 * 60)
        );
    }

    #[test]
    fn example_config_round_trips_through_loader() -> Result<()> {
        let _guard = env_lock();
        clear_api_env();
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[auth]"));
        assert!(example.contains("[ui]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 20);
        Ok(())
    }
}
