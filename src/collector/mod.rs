//! Fetches current weather for each configured city and flattens the responses
//! into a [`WeatherBatch`].

pub mod error;
pub mod flatten;

use crate::collector::error::FetchError;
use crate::collector::flatten::{flatten_object, FIELD_SEPARATOR};
use crate::types::batch::WeatherBatch;
use crate::types::record::CityWeatherRecord;
use crate::utils::error_chain;
use bon::bon;
use log::{debug, error, warn};
use reqwest::Client;
use serde_json::Value;
use std::fmt;

/// OpenWeather "current weather" endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const UNITS: &str = "metric";

/// Queries the weather API once per city, strictly one city after another.
///
/// # Examples
///
/// ```no_run
/// # use weather_collector::Collector;
/// # #[tokio::main]
/// # async fn main() {
/// let collector = Collector::builder()
///     .cities(vec!["London".to_string(), "Lima".to_string()])
///     .api_key("secret".to_string())
///     .build();
///
/// let batch = collector.collect().await;
/// println!("collected {} of 2 cities", batch.len());
/// # }
/// ```
#[derive(Clone)]
pub struct Collector {
    cities: Vec<String>,
    api_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("cities", &self.cities)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[bon]
impl Collector {
    /// Creates a collector. `base_url` defaults to [`DEFAULT_BASE_URL`] and
    /// `http` to a client with reqwest's default settings.
    #[builder]
    pub fn new(
        cities: Vec<String>,
        api_key: String,
        base_url: Option<String>,
        http: Option<Client>,
    ) -> Self {
        Self {
            cities,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http: http.unwrap_or_default(),
        }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Fetches every configured city in order.
    ///
    /// A failing city is logged and skipped; it never stops the remaining
    /// cities from being fetched. Non-success statuses are logged as warnings,
    /// everything else (transport, body, JSON) as errors.
    pub async fn collect(&self) -> WeatherBatch {
        let mut batch = WeatherBatch::new();

        for city in &self.cities {
            match self.fetch_city(city).await {
                Ok(record) => {
                    debug!("Collected {} fields for {}", record.len(), city);
                    batch.push(record);
                }
                Err(FetchError::HttpStatus { city, status }) => {
                    warn!(
                        "Failed to fetch data for {}: {}, {}",
                        city,
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    );
                }
                Err(e) => {
                    error!(
                        "Error while fetching data for {}: {}",
                        e.city(),
                        error_chain(&e)
                    );
                }
            }
        }

        batch
    }

    /// Single attempt at fetching and flattening the current weather for `city`.
    pub async fn fetch_city(&self, city: &str) -> Result<CityWeatherRecord, FetchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Request {
                city: city.to_string(),
                source,
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::HttpStatus {
                city: city.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Body {
            city: city.to_string(),
            source,
        })?;

        let parsed: Value =
            serde_json::from_slice(&body).map_err(|source| FetchError::JsonParse {
                city: city.to_string(),
                source,
            })?;

        match parsed {
            Value::Object(object) => Ok(CityWeatherRecord::new(
                city,
                flatten_object(&object, FIELD_SEPARATOR),
            )),
            _ => Err(FetchError::NotAnObject {
                city: city.to_string(),
            }),
        }
    }
}
