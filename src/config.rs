//! Runtime configuration, read once from the environment at startup.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `WEATHER_API_KEY` | yes | |
//! | `WEATHER_API_BASE_URL` | no | [`DEFAULT_BASE_URL`] |
//! | `WEATHER_CITIES` | no | [`DEFAULT_CITIES`], comma separated |
//! | `WEATHER_STORAGE_BACKEND` | no | `azure` (`azure` or `local`) |
//! | `AZURE_STORAGE_ACCOUNT_NAME` | for `azure` | |
//! | `AZURE_STORAGE_ACCOUNT_KEY` | for `azure` | |
//! | `WEATHER_LOCAL_DIR` | for `local` | |
//! | `WEATHER_CONTAINER` | no | [`DEFAULT_CONTAINER`] |
//! | `WEATHER_SCHEDULE_MINUTES` | no | `30` |
//! | `WEATHER_RUN_ON_STARTUP` | no | `false` |
//!
//! Blank values count as unset. `WEATHER_CITIES` is split on commas and each
//! entry trimmed, so a query that itself contains a comma cannot be configured:
//! `Paris,FR` is read as the two cities `Paris` and `FR`.

use crate::collector::DEFAULT_BASE_URL;
use crate::utils::non_blank;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "WEATHER_API_BASE_URL";
pub const CITIES_VAR: &str = "WEATHER_CITIES";
pub const BACKEND_VAR: &str = "WEATHER_STORAGE_BACKEND";
pub const ACCOUNT_NAME_VAR: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const ACCOUNT_KEY_VAR: &str = "AZURE_STORAGE_ACCOUNT_KEY";
pub const LOCAL_DIR_VAR: &str = "WEATHER_LOCAL_DIR";
pub const CONTAINER_VAR: &str = "WEATHER_CONTAINER";
pub const SCHEDULE_MINUTES_VAR: &str = "WEATHER_SCHEDULE_MINUTES";
pub const RUN_ON_STARTUP_VAR: &str = "WEATHER_RUN_ON_STARTUP";

pub const DEFAULT_CONTAINER: &str = "weatherparquet";
pub const DEFAULT_PERIOD_MINUTES: u32 = 30;

pub const DEFAULT_CITIES: &[&str] = &[
    "London",
    "New York",
    "Tokyo",
    "Paris",
    "Sydney",
    "Manila",
    "Jakarta",
    "Berlin",
    "Madrid",
    "Seoul",
    "Bangkok",
    "Singapore",
    "Mumbai",
    "Los Angeles",
    "Edinburgh",
    "Dublin",
    "Porto",
    "Cape Town",
    "Auckland",
    "Rio de Janeiro",
    "Lima",
    "Montevideo",
    "Buenos Aires",
];

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the weather API side needs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub cities: Vec<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("cities", &self.cities)
            .finish()
    }
}

/// Where run outputs are written.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Azure Blob Storage, authenticated with the account's shared key.
    Azure { account: String, access_key: String },
    /// A directory on disk; the container becomes a subdirectory of `root`.
    Local { root: PathBuf },
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Azure { account, .. } => f
                .debug_struct("Azure")
                .field("account", account)
                .field("access_key", &"<redacted>")
                .finish(),
            StorageBackend::Local { root } => {
                f.debug_struct("Local").field("root", root).finish()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    backend: StorageBackend,
    container: String,
}

impl StorageConfig {
    pub fn new(backend: StorageBackend, container: impl Into<String>) -> Self {
        Self {
            backend,
            container: container.into(),
        }
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    pub fn container(&self) -> &str {
        &self.container
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Minutes between runs, aligned to UTC midnight. Divides a day evenly.
    pub period_minutes: u32,
    /// Run once immediately instead of waiting for the first boundary.
    pub run_on_startup: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            period_minutes: DEFAULT_PERIOD_MINUTES,
            run_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| non_blank(lookup(var));
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if let Err(e) = reqwest::Url::parse(&base_url) {
            return Err(ConfigError::Invalid {
                var: BASE_URL_VAR,
                value: base_url,
                reason: e.to_string(),
            });
        }

        let cities = match get(CITIES_VAR) {
            Some(raw) => parse_cities(&raw)?,
            None => DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
        };

        let api = ApiConfig {
            api_key: require(API_KEY_VAR)?,
            base_url,
            cities,
        };

        let backend = match get(BACKEND_VAR).as_deref().map(str::to_lowercase).as_deref() {
            None | Some("azure") => StorageBackend::Azure {
                account: require(ACCOUNT_NAME_VAR)?,
                access_key: require(ACCOUNT_KEY_VAR)?,
            },
            Some("local") => StorageBackend::Local {
                root: PathBuf::from(require(LOCAL_DIR_VAR)?),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: BACKEND_VAR,
                    value: other.to_string(),
                    reason: "expected 'azure' or 'local'".to_string(),
                })
            }
        };
        let container = get(CONTAINER_VAR).unwrap_or_else(|| DEFAULT_CONTAINER.to_string());

        let schedule = ScheduleConfig {
            period_minutes: match get(SCHEDULE_MINUTES_VAR) {
                Some(raw) => parse_period(&raw)?,
                None => DEFAULT_PERIOD_MINUTES,
            },
            run_on_startup: match get(RUN_ON_STARTUP_VAR) {
                Some(raw) => parse_bool(RUN_ON_STARTUP_VAR, &raw)?,
                None => false,
            },
        };

        Ok(Self {
            api,
            storage: StorageConfig::new(backend, container),
            schedule,
        })
    }
}

fn parse_cities(raw: &str) -> Result<Vec<String>, ConfigError> {
    let cities: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if cities.is_empty() {
        return Err(ConfigError::Invalid {
            var: CITIES_VAR,
            value: raw.to_string(),
            reason: "no city names given".to_string(),
        });
    }
    Ok(cities)
}

fn parse_period(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: SCHEDULE_MINUTES_VAR,
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let minutes: u32 = raw
        .parse()
        .map_err(|_| invalid("not a whole number of minutes"))?;
    if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
        return Err(invalid("must be a positive divisor of 1440"));
    }
    Ok(minutes)
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
