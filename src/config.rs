use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub start_list: StartListSettings,
    pub stats: StatsSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub limiter: LimiterSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartListSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsSettings {
    pub base_url: String,
    #[serde(default = "default_organisation")]
    pub organisation: String,
    #[serde(default = "default_source_of_data")]
    pub source_of_data: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Redis connection URL; the cache is process-local when unset
    pub redis_url: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_secs: default_ttl_secs(),
            l1_cache_size: default_l1_cache_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimiterSettings {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_timeout_secs() -> u64 { 30 }
fn default_organisation() -> String { "TROT".to_string() }
fn default_source_of_data() -> String { "SPORT".to_string() }
fn default_ttl_secs() -> u64 { crate::services::DEFAULT_TTL_SECS }
fn default_l1_cache_size() -> u64 { 1000 }
fn default_max_concurrent() -> usize { crate::core::DEFAULT_MAX_CONCURRENT }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with STARTSPEED__)
    /// 5. Provider variables (START_LIST_API_BASE_URL, STAT_API_URL_BASE, REDIS_*)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., STARTSPEED__LIMITER__MAX_CONCURRENT -> limiter.max_concurrent
            .add_source(
                Environment::with_prefix("STARTSPEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("STARTSPEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }
}

/// Apply the provider variables a `.env` file usually carries
///
/// `REDIS_HOSTNAME`, `REDIS_PORT` and `REDIS_PASSWORD` are combined into a
/// `redis://default:<password>@<host>:<port>` URL. Blank variables count as unset.
fn substitute_env_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = lookup("START_LIST_API_BASE_URL") {
        builder = builder.set_override("start_list.base_url", url)?;
    }
    if let Some(url) = lookup("STAT_API_URL_BASE") {
        builder = builder.set_override("stats.base_url", url)?;
    }
    if let Some(redis_url) = redis_url_from_parts(&lookup) {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}

fn redis_url_from_parts<F>(lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("REDIS_HOSTNAME")?;
    let port = lookup("REDIS_PORT").unwrap_or_else(|| "6379".to_string());

    Some(match lookup("REDIS_PASSWORD") {
        Some(password) => format!("redis://default:{}@{}:{}", password, host, port),
        None => format!("redis://{}:{}", host, port),
    })
}
