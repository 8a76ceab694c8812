//! [`Config`]-related definitions.

use std::time;

use common::query::DEFAULT_PAGE_SIZE_PARAM;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use service::infra::http;
use smart_default::SmartDefault;
use url::Url;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Back-office API configuration.
    pub api: Api,

    /// Table configuration.
    pub table: Table,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Back-office API configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL of the API.
    #[default("http://127.0.0.1:8000".to_owned())]
    pub base_url: String,

    /// CSRF token to send along with every request.
    pub csrf_token: Option<SecretString>,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Name of the query parameter carrying the page size.
    #[default(DEFAULT_PAGE_SIZE_PARAM.to_owned())]
    pub page_size_param: String,
}

impl TryFrom<Api> for http::Config {
    type Error = url::ParseError;

    fn try_from(value: Api) -> Result<Self, Self::Error> {
        let Api {
            base_url,
            csrf_token,
            timeout,
            page_size_param,
        } = value;

        Ok(Self {
            base_url: Url::parse(&base_url)?,
            csrf_token,
            timeout,
            page_size_param,
        })
    }
}

/// Table configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Table {
    /// Pause in search input after which the search is performed.
    #[default(time::Duration::from_millis(300))]
    #[serde(with = "humantime_serde")]
    pub debounce: time::Duration,

    /// Number of records per page.
    #[default(10)]
    pub page_size: u32,

    /// Number of pages shown around the current one in a pager.
    #[default(2)]
    pub pager_window: u32,
}

impl From<Table> for service::table::Config {
    fn from(value: Table) -> Self {
        let Table {
            debounce,
            page_size,
            pager_window: _,
        } = value;

        Self {
            debounce,
            page_size,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
