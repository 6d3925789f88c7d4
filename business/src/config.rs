use std::time::Duration;

use log::info;
use outposts_states::{DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE, Ordering, TableOptions};
use serde::Deserialize;
use ustr::Ustr;

/// Prefix of every environment variable read by [`BusinessConfig::init`].
pub const ENV_PREFIX: &str = "OUTPOSTS_";

pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Server root without a trailing slash, e.g. `https://auth.example.com`.
    pub api_base_url: String,
    /// Bearer token sent with every request when present.
    pub token: Option<String>,
    pub page_size: u32,
    pub search_debounce: Duration,
    pub health_interval: Duration,
    pub request_timeout: Duration,
}

// An intermediate struct for deserializing environment variables
// where every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    base_url: Option<String>,
    token: Option<String>,
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
    health_interval_secs: Option<u64>,
    timeout_secs: Option<u64>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Root of the versioned REST API.
    pub fn api_url(&self) -> Ustr {
        ustr::ustr(&format!("{}/api/v2beta", self.api_base_url))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Options for a table controller using the configured paging and debounce.
    pub fn table_options(&self, ordering: Option<Ordering>) -> TableOptions {
        TableOptions {
            page_size: self.page_size,
            search_debounce: self.search_debounce,
            ordering,
        }
    }

    /// Loads configuration from `OUTPOSTS_*` environment variables.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_vars(std::env::vars())
    }

    /// Builds configuration from `(name, value)` pairs; only `OUTPOSTS_*` names are read.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> anyhow::Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.into()))
            })
            .collect();
        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            base_url,
            token,
            page_size,
            search_debounce_ms,
            health_interval_secs,
            timeout_secs,
        } = raw;

        let api_base_url = match base_url {
            Some(url) => {
                info!("Using provided {ENV_PREFIX}BASE_URL: {url}");
                url
            }
            None => {
                info!("{ENV_PREFIX}BASE_URL not set, defaulting to {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_owned()
            }
        };
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            anyhow::bail!(
                "{ENV_PREFIX}BASE_URL must start with http:// or https://, got {api_base_url:?}"
            );
        }

        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            anyhow::bail!("{ENV_PREFIX}PAGE_SIZE must be at least 1");
        }

        let health_interval =
            health_interval_secs.map_or(DEFAULT_HEALTH_INTERVAL, Duration::from_secs);
        if health_interval.is_zero() {
            anyhow::bail!("{ENV_PREFIX}HEALTH_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url),
            token: token.filter(|t| !t.trim().is_empty()),
            page_size,
            search_debounce: search_debounce_ms
                .map_or(DEFAULT_SEARCH_DEBOUNCE, Duration::from_millis),
            health_interval,
            request_timeout: timeout_secs.map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
        })
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_owned(),
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            health_interval: DEFAULT_HEALTH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let config = BusinessConfig::from_vars(Vec::<(String, String)>::new())
            .expect("empty env should build");
        assert_eq!(config, BusinessConfig::default());
        assert_eq!(config.api_url(), Ustr::from("http://localhost:9000/api/v2beta"));
    }

    #[test]
    fn reads_prefixed_vars_only() {
        let config = BusinessConfig::from_vars(vec![
            ("OUTPOSTS_BASE_URL", "https://auth.example.com/"),
            ("OUTPOSTS_TOKEN", "secret"),
            ("OUTPOSTS_PAGE_SIZE", "50"),
            ("OUTPOSTS_SEARCH_DEBOUNCE_MS", "120"),
            ("OUTPOSTS_HEALTH_INTERVAL_SECS", "5"),
            ("OUTPOSTS_TIMEOUT_SECS", "3"),
            ("PAGE_SIZE", "7"),
        ])
        .expect("config should build");

        assert_eq!(config.api_base_url, "https://auth.example.com");
        assert_eq!(config.token(), Some("secret"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce, Duration::from_millis(120));
        assert_eq!(config.health_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = BusinessConfig::from_vars(vec![("OUTPOSTS_TOKEN", "  ")]).unwrap();
        assert_eq!(config.token(), None);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = BusinessConfig::from_vars(vec![("OUTPOSTS_PAGE_SIZE", "0")]).unwrap_err();
        assert!(err.to_string().contains("PAGE_SIZE"));
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = BusinessConfig::from_vars(vec![("OUTPOSTS_BASE_URL", "auth.example.com")])
            .unwrap_err();
        assert!(err.to_string().contains("BASE_URL"));
    }

    #[test]
    fn table_options_follow_config() {
        let config = BusinessConfig {
            page_size: 5,
            ..BusinessConfig::default()
        };
        let options = config.table_options(Some(Ordering::ascending("name")));
        assert_eq!(options.page_size, 5);
        assert_eq!(options.search_debounce, DEFAULT_SEARCH_DEBOUNCE);
        assert_eq!(options.ordering, Some(Ordering::ascending("name")));
    }
}
