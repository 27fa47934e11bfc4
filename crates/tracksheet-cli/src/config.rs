// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracksheet_sheets::DEFAULT_SHEET_URL;

pub const APP_NAME: &str = "tracksheet";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "30s";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            server: Server::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_SHEET_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub api_url: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TRACKSHEET_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TRACKSHEET_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
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
                    "config file {} has no version. Add `version = 1` and put values under [source], [server], and [ui]",
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

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(url) = &self.source.url {
            let parsed = url::Url::parse(url.trim()).with_context(|| {
                format!("source.url in {} is not a valid URL: {url:?}", path.display())
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "source.url in {} must use http or https, got {}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("source.timeout in {}", path.display()))?;
            if parsed <= Duration::ZERO {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(bind) = &self.server.bind {
            bind.parse::<SocketAddr>().with_context(|| {
                format!(
                    "server.bind in {} must be a socket address like {DEFAULT_BIND}, got {bind:?}",
                    path.display()
                )
            })?;
        }

        if let Some(api_url) = &self.ui.api_url {
            url::Url::parse(api_url.trim()).with_context(|| {
                format!("ui.api_url in {} is not a valid URL: {api_url:?}", path.display())
            })?;
        }

        Ok(())
    }

    pub fn source_url(&self) -> &str {
        self.source
            .url
            .as_deref()
            .unwrap_or(DEFAULT_SHEET_URL)
            .trim()
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn bind_addr(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn api_url(&self) -> Option<&str> {
        self.ui
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tracksheet config\n# Place this file at: {}\n\nversion = 1\n\n[source]\n# Published CSV export of the tracking sheet\nurl = \"{}\"\ntimeout = \"{}\"\n\n[server]\nbind = \"{}\"\n\n[ui]\n# Optional. Read through a running `tracksheet --serve` instead of the sheet\n# api_url = \"http://{}\"\n",
            path.display(),
            DEFAULT_SHEET_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_BIND,
            DEFAULT_BIND,
        )
    }
}

/// Accepts `<N>ms`, `<N>s`, or `<N>m`.
fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(raw.len());
    let (amount, unit) = raw.split_at(split);
    let amount: u64 = amount
        .parse()
        .with_context(|| format!("invalid duration {raw:?}: expected a whole number first"))?;
    match unit {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => Ok(Duration::from_secs(amount.saturating_mul(60))),
        _ => bail!("invalid duration {raw:?}; use <N>ms, <N>s or <N>m (for example 500ms or 30s)"),
    }
}
