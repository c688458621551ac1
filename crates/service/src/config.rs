use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use time::Duration;
use url::Url;

use common::pointer::PointerName;

#[derive(Debug, Clone)]
pub struct Config {
    /// how long a published record stays fresh before readers
    ///  consider it expired
    pub record_ttl: Duration,
    /// fee the registry charges for binding a custom domain
    pub domain_fee: u64,
    /// accept expired records when resolving instead of failing
    pub tolerate_stale: bool,
    /// deprecated static mapping for identifiers created before the
    ///  pointer scheme; empty by default
    pub legacy_aliases: HashMap<String, PointerName>,
    /// base URL of an HTTP content store gateway; if not set then the
    ///  in-memory store is used
    pub gateway_url: Option<Url>,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            record_ttl: Duration::hours(48),
            domain_fee: 0,
            tolerate_stale: false,
            legacy_aliases: HashMap::new(),
            gateway_url: None,
            log_level: tracing::Level::INFO,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("legacy alias '{0}' maps to an invalid pointer name")]
    InvalidAlias(String),
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// On-disk representation of the config file
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    record_ttl_hours: Option<i64>,
    domain_fee: Option<u64>,
    tolerate_stale: Option<bool>,
    legacy_aliases: Option<HashMap<String, String>>,
    gateway_url: Option<String>,
    log_level: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field the file omits
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)?;

        let mut config = Config::default();

        if let Some(hours) = file.record_ttl_hours {
            config.record_ttl = Duration::hours(hours);
        }
        if let Some(fee) = file.domain_fee {
            config.domain_fee = fee;
        }
        if let Some(tolerate) = file.tolerate_stale {
            config.tolerate_stale = tolerate;
        }
        if let Some(aliases) = file.legacy_aliases {
            let mut table = HashMap::new();
            for (alias, name) in aliases {
                let name = PointerName::parse(&name)
                    .map_err(|_| ConfigError::InvalidAlias(alias.clone()))?;
                table.insert(alias, name);
            }
            config.legacy_aliases = table;
        }
        if let Some(url) = file.gateway_url {
            config.gateway_url =
                Some(Url::parse(&url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?);
        }
        if let Some(level) = file.log_level {
            config.log_level = level
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }

        Ok(config)
    }
}
