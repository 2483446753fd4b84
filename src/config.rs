use crate::errors::ConfigError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.solanabeach.io/v1";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_PATH: &str = ".solana-beach-cache.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    File,
    Mongo,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "file" => Ok(CacheBackend::File),
            "mongo" | "mongodb" => Ok(CacheBackend::Mongo),
            other => Err(ConfigError::InvalidValue {
                name: "CACHE_BACKEND",
                reason: format!("unknown backend '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub headers: Vec<(String, String)>,
    pub cache_ttl: Duration,
    pub cache_backend: CacheBackend,
    pub cache_path: PathBuf,
    pub mongo_uri: Option<String>,
    pub db_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            headers: default_headers(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_backend: CacheBackend::File,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            mongo_uri: None,
            db_name: "solana_beach".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("SOLANA_BEACH_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "SOLANA_BEACH_API_URL",
                reason: format!("'{}' is not an http(s) URL", api_url),
            });
        }

        let mut headers = defaults.headers;
        if let Some(raw) = lookup("API_HEADERS") {
            headers.extend(parse_headers(&raw)?);
        }
        if let Some(key) = lookup("SOLANA_BEACH_API_KEY").filter(|k| !k.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Bearer {}", key)));
        }

        let cache_ttl = match lookup("CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|e| {
                ConfigError::InvalidValue {
                    name: "CACHE_TTL_SECS",
                    reason: format!("{}", e),
                }
            })?),
            None => defaults.cache_ttl,
        };

        let cache_backend = match lookup("CACHE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.cache_backend,
        };

        let mongo_uri = lookup("MONGO_URI");
        if cache_backend == CacheBackend::Mongo && mongo_uri.is_none() {
            return Err(ConfigError::Missing("MONGO_URI"));
        }

        Ok(Self {
            api_url,
            headers,
            cache_ttl,
            cache_backend,
            cache_path: lookup("CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            mongo_uri,
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
        })
    }
}

fn default_headers() -> Vec<(String, String)> {
    vec![("Accept".to_string(), "application/json".to_string())]
}

/// Parses `Name: value;Other-Name: value`.
fn parse_headers(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, value) = entry.split_once(':').ok_or_else(|| ConfigError::InvalidValue {
                name: "API_HEADERS",
                reason: format!("'{}' is missing a ':' separator", entry),
            })?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
