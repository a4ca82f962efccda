//! Client configuration resolved from build-time environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! A WASM bundle has no process environment at runtime, so settings are baked
//! in with `option_env!` when the bundle is compiled. Every value has a default
//! and unparseable values fall back to it.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_USER_KEY: &str = "auth_user";
pub const DEFAULT_TOKEN_KEY: &str = "auth_token";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 4000;

/// Route of the guest-only login view.
pub const LOGIN_PATH: &str = "/login";
/// Route of the authenticated home view.
pub const HOME_PATH: &str = "/";

/// Durable-storage key names shared by every session reader and writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub user_key: String,
    pub token_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self { user_key: DEFAULT_USER_KEY.to_owned(), token_key: DEFAULT_TOKEN_KEY.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin + prefix every API path is joined onto (no trailing slash).
    pub api_base_url: String,
    pub storage_keys: StorageKeys,
    /// Delay between a 401 and the forced navigation to the login view.
    pub redirect_delay: Duration,
    /// How long a toast stays on screen.
    pub notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            storage_keys: StorageKeys::default(),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            notice_ttl: Duration::from_millis(DEFAULT_NOTICE_TTL_MS),
        }
    }
}

impl ClientConfig {
    /// Build config from variables captured at compile time.
    ///
    /// Optional:
    /// - `SESSION_API_BASE_URL`: default `/api`
    /// - `SESSION_USER_KEY`: default `auth_user`
    /// - `SESSION_TOKEN_KEY`: default `auth_token`
    /// - `SESSION_REDIRECT_DELAY_MS`: default 3000
    /// - `SESSION_NOTICE_TTL_MS`: default 4000
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("SESSION_API_BASE_URL"),
            option_env!("SESSION_USER_KEY"),
            option_env!("SESSION_TOKEN_KEY"),
            option_env!("SESSION_REDIRECT_DELAY_MS"),
            option_env!("SESSION_NOTICE_TTL_MS"),
        )
    }

    fn from_values(
        base_url: Option<&str>,
        user_key: Option<&str>,
        token_key: Option<&str>,
        redirect_delay_ms: Option<&str>,
        notice_ttl_ms: Option<&str>,
    ) -> Self {
        let api_base_url = non_empty(base_url)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        let storage_keys = StorageKeys {
            user_key: non_empty(user_key).unwrap_or(DEFAULT_USER_KEY).to_owned(),
            token_key: non_empty(token_key).unwrap_or(DEFAULT_TOKEN_KEY).to_owned(),
        };
        Self {
            api_base_url,
            storage_keys,
            redirect_delay: Duration::from_millis(parse_u64(redirect_delay_ms, DEFAULT_REDIRECT_DELAY_MS)),
            notice_ttl: Duration::from_millis(parse_u64(notice_ttl_ms, DEFAULT_NOTICE_TTL_MS)),
        }
    }

    /// Join an API path onto the configured base URL.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    non_empty(raw).map_or(default, |v| v.parse::<u64>().unwrap_or(default))
}
