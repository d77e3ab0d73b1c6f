use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use storage::SessionStore;
use url::Url;

pub const DEFAULT_TOP_K: u32 = 5;
pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub default_top_k: u32,
    pub session_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            default_top_k: DEFAULT_TOP_K,
            session_file: None,
            request_timeout_secs: None,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// File-backed when `session_file` is set, in-memory otherwise.
    pub fn open_session_store(&self) -> anyhow::Result<SessionStore> {
        match &self.session_file {
            Some(path) => SessionStore::open_file(path),
            None => Ok(SessionStore::in_memory()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    default_top_k: Option<u32>,
    session_file: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if file.exists() {
        let raw = fs::read_to_string(file)
            .with_context(|| format!("failed to read settings file '{}'", file.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?;
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.default_top_k {
            settings.default_top_k = v;
        }
        if let Some(v) = file_cfg.session_file {
            settings.session_file = Some(v);
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
    }

    let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__DEFAULT_TOP_K") {
        settings.default_top_k = v
            .trim()
            .parse()
            .with_context(|| format!("APP__DEFAULT_TOP_K is not a positive integer: {v}"))?;
    }
    if let Some(v) = var("APP__SESSION_FILE") {
        settings.session_file = Some(PathBuf::from(v));
    }
    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = Some(
            v.trim()
                .parse()
                .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not an integer: {v}"))?,
        );
    }

    if settings.default_top_k == 0 {
        bail!("default_top_k must be at least 1");
    }
    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    Ok(settings)
}

/// Trims whitespace and trailing slashes, and requires an http(s) URL.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("api base url is empty");
    }

    let parsed =
        Url::parse(trimmed).with_context(|| format!("invalid api base url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api base url must use http or https, got '{}'", parsed.scheme());
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        bail!("api base url must not carry a query or fragment: '{trimmed}'");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
