//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.callbridge/config.json`) and environment.
//! Every field has a default so a missing file still yields a runnable server.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound mail settings (SMTP relay, credentials, sender).
    #[serde(default)]
    pub mail: MailConfig,

    /// Strings substituted into the email templates.
    #[serde(default)]
    pub branding: BrandingConfig,
}

/// Server bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the webhook endpoints (default 8000).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the voice platform must be able to reach the webhooks).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    8000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// Which mail transport to construct at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransportKind {
    /// Real SMTP relay (STARTTLS, username/password).
    #[default]
    Smtp,

    /// Log-only transport; sends always succeed. For tests and credential-less dev runs.
    Noop,
}

/// Outbound mail config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailConfig {
    #[serde(default)]
    pub transport: MailTransportKind,

    /// SMTP relay host (default "smtp.gmail.com").
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP submission port (default 587, STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Account username. Overridden by SMTP_USERNAME env when set.
    pub username: Option<String>,

    /// Account password (e.g. an app password). Overridden by SMTP_PASSWORD env when set.
    pub password: Option<String>,

    /// From address; defaults to the username when unset.
    pub from_address: Option<String>,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransportKind::default(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
        }
    }
}

/// Names and contact details substituted into the two email templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Display name the voice agent signs emails with.
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    #[serde(default = "default_phone")]
    pub phone: String,

    #[serde(default = "default_address")]
    pub address: String,
}

fn default_company_name() -> String {
    "Boca Raton Health Insurers".to_string()
}

fn default_agent_name() -> String {
    "Gail".to_string()
}

fn default_phone() -> String {
    "(561) 555-0123".to_string()
}

fn default_address() -> String {
    "123 Health Plaza, Boca Raton, FL 33432".to_string()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            agent_name: default_agent_name(),
            phone: default_phone(),
            address: default_address(),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the SMTP username: env SMTP_USERNAME overrides config.
pub fn resolve_smtp_username(config: &Config) -> Option<String> {
    env_non_empty("SMTP_USERNAME").or_else(|| {
        config
            .mail
            .username
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the SMTP password: env SMTP_PASSWORD overrides config.
pub fn resolve_smtp_password(config: &Config) -> Option<String> {
    env_non_empty("SMTP_PASSWORD").or_else(|| {
        config
            .mail
            .password
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CALLBRIDGE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".callbridge").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or CALLBRIDGE_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}
