// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the portfolio contact relay.
//!
//! Defaults reproduce the behaviour of the site's original contact route:
//! five submissions per client per hour, delivered through Resend.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Outbound email configuration
    #[serde(default)]
    pub email: EmailConfig,
}

/// Per-client submission limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window per client (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired entries in seconds (default: 300)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Bounds applied to contact form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_min_len")]
    pub name_min_len: usize,

    #[serde(default = "default_name_max_len")]
    pub name_max_len: usize,

    #[serde(default = "default_message_min_len")]
    pub message_min_len: usize,

    #[serde(default = "default_message_max_len")]
    pub message_max_len: usize,
}

/// Email provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Resend API key. `None` means the relay is not configured.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the email API (default: https://api.resend.com)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Sender address
    #[serde(default = "default_from")]
    pub from: String,

    /// Recipient address
    #[serde(default = "default_to")]
    pub to: String,

    /// Request timeout for the provider call in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Escape submitted values before embedding them in HTML (default: true)
    #[serde(default = "default_true")]
    pub escape_html: bool,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_name_min_len() -> usize {
    2
}

fn default_name_max_len() -> usize {
    100
}

fn default_message_min_len() -> usize {
    10
}

fn default_message_max_len() -> usize {
    2000
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}

fn default_to() -> String {
    "hello@example.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_len: default_name_min_len(),
            name_max_len: default_name_max_len(),
            message_min_len: default_message_min_len(),
            message_max_len: default_message_max_len(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            from: default_from(),
            to: default_to(),
            timeout_secs: default_timeout_secs(),
            escape_html: default_true(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl EmailConfig {
    /// Get the provider request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults; numeric variables that fail to
    /// parse do too.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            rate_limit: RateLimitConfig {
                max_requests: parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS")
                    .unwrap_or(defaults.rate_limit.max_requests),
                window_secs: parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS")
                    .unwrap_or(defaults.rate_limit.window_secs),
                // tokio intervals cannot have a zero period
                sweep_interval_secs: parse_var(&lookup, "RATE_LIMIT_SWEEP_SECS")
                    .filter(|secs: &u64| *secs > 0)
                    .unwrap_or(defaults.rate_limit.sweep_interval_secs),
            },
            validation: defaults.validation,
            email: EmailConfig {
                api_key: lookup("RESEND_API_KEY").filter(|v| !v.trim().is_empty()),
                api_base_url: lookup("RESEND_API_URL").unwrap_or(defaults.email.api_base_url),
                from: lookup("CONTACT_FROM").unwrap_or(defaults.email.from),
                to: lookup("CONTACT_EMAIL")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(defaults.email.to),
                timeout_secs: parse_var(&lookup, "RESEND_TIMEOUT_SECS")
                    .unwrap_or(defaults.email.timeout_secs),
                escape_html: defaults.email.escape_html,
            },
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
