//! Configuration types for rtms-collector
//!
//! The configuration is built once at startup (usually with [`Config::from_env`])
//! and handed to the fetcher, the store and the API server. Nothing else in the
//! crate reads the environment.

use crate::error::{Error, Result};
use crate::utils::is_valid_region_code;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use utoipa::ToSchema;

/// Default trade API endpoint (apartment trades, detailed variant)
pub const DEFAULT_ENDPOINT: &str =
    "http://apis.data.go.kr/1613000/RTMSDataSvcAptTradeDev/getRTMSDataSvcAptTradeDev";

/// Number of rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// The 25 Seoul district codes collected on every run
pub const SEOUL_REGION_CODES: [&str; 25] = [
    "11110", "11140", "11170", "11200", "11215", "11230", "11260", "11290", "11305", "11320",
    "11350", "11380", "11410", "11440", "11470", "11500", "11530", "11545", "11560", "11590",
    "11620", "11650", "11680", "11710", "11740",
];

/// Environment variables that must be present for [`Config::from_env`]
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "DECODED_API_KEY",
    "DB_HOST",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "DB_PORT",
];

/// Main configuration for the collector
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Trade API access
    pub api: ApiSourceConfig,

    /// Database connection settings
    pub database: DatabaseConfig,

    /// HTTP trigger server
    #[serde(default)]
    pub server: ServerConfig,

    /// Region codes collected on every run
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Optional periodic collection
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSourceConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            regions: default_regions(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Trade API access settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiSourceConfig {
    /// Decoded service key issued by data.go.kr (never serialized)
    #[serde(skip_serializing, default)]
    pub service_key: String,

    /// Endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Rows per page (default: 1000)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSourceConfig {
    fn default() -> Self {
        Self {
            service_key: String::new(),
            endpoint: default_endpoint(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSourceConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Database connection settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,

    /// Database user
    pub user: String,

    /// Database password (never serialized)
    #[serde(skip_serializing, default)]
    pub password: String,

    /// Database (schema) name
    pub name: String,

    /// Database port (default: 3306)
    #[serde(default = "default_db_port")]
    pub port: u16,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            user: String::new(),
            password: String::new(),
            name: String::new(),
            port: default_db_port(),
        }
    }
}

impl DatabaseConfig {
    /// MySQL connection URL with percent-encoded credentials
    pub fn connection_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}?charset=utf8mb4",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            urlencoding::encode(&self.name),
        )
    }
}

/// HTTP trigger server settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Serve Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            swagger_ui: true,
        }
    }
}

/// Periodic collection settings
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ScheduleConfig {
    /// Seconds between automatic runs (None = only run when triggered)
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

impl ScheduleConfig {
    /// Interval between automatic runs, if enabled
    pub fn interval(&self) -> Option<Duration> {
        self.interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Config {
    /// Build the configuration from process environment variables
    ///
    /// Required: `DECODED_API_KEY`, `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT`.
    /// Optional: `PORT` (HTTP port, default 8080), `RTMS_ENDPOINT`, `COLLECT_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Every missing required key is reported in a single error. Empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_ENV_VARS
            .iter()
            .copied()
            .filter(|key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Config {
                message: format!(
                    "required environment variables are not set: {}",
                    missing.join(", ")
                ),
                key: missing.first().map(|key| key.to_string()),
            });
        }

        let required = |key: &str| get(key).unwrap_or_default();

        let db_port = parse_var::<u16>("DB_PORT", &required("DB_PORT"))?;
        let http_port = match get("PORT") {
            Some(raw) => parse_var::<u16>("PORT", &raw)?,
            None => default_bind_address().port(),
        };
        let interval_secs = get("COLLECT_INTERVAL_SECS")
            .map(|raw| parse_var::<u64>("COLLECT_INTERVAL_SECS", &raw))
            .transpose()?;

        let config = Config {
            api: ApiSourceConfig {
                service_key: required("DECODED_API_KEY"),
                endpoint: get("RTMS_ENDPOINT").unwrap_or_else(default_endpoint),
                ..Default::default()
            },
            database: DatabaseConfig {
                host: required("DB_HOST"),
                user: required("DB_USER"),
                password: required("DB_PASSWORD"),
                name: required("DB_NAME"),
                port: db_port,
            },
            server: ServerConfig {
                bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), http_port),
                ..Default::default()
            },
            regions: default_regions(),
            schedule: ScheduleConfig { interval_secs },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check settings that would make every fetch fail
    pub fn validate(&self) -> Result<()> {
        if self.api.service_key.trim().is_empty() {
            return Err(config_error("service key is empty", "DECODED_API_KEY"));
        }

        url::Url::parse(&self.api.endpoint).map_err(|e| {
            config_error(
                &format!("invalid endpoint URL {:?}: {}", self.api.endpoint, e),
                "RTMS_ENDPOINT",
            )
        })?;

        if self.api.page_size == 0 {
            return Err(config_error("page size must be greater than zero", "page_size"));
        }

        if self.regions.is_empty() {
            return Err(config_error("no region codes configured", "regions"));
        }
        if let Some(bad) = self.regions.iter().find(|code| !is_valid_region_code(code)) {
            return Err(config_error(
                &format!("region code {:?} is not five digits", bad),
                "regions",
            ));
        }

        Ok(())
    }
}

fn config_error(message: &str, key: &str) -> Error {
    Error::Config {
        message: message.to_string(),
        key: Some(key.to_string()),
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| config_error(&format!("{} has invalid value {:?}: {}", key, raw, e), key))
}

// Default value functions
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_db_port() -> u16 {
    3306
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
}

fn default_true() -> bool {
    true
}

fn default_regions() -> Vec<String> {
    SEOUL_REGION_CODES.iter().map(|c| c.to_string()).collect()
}
