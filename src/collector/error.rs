use reqwest::StatusCode;
use thiserror::Error;

/// Why a single city produced no record. Never fatal for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {city}")]
    Request {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather API answered {status} for {city}")]
    HttpStatus { city: String, status: StatusCode },

    #[error("Failed to read response body for {city}")]
    Body {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response for {city}")]
    JsonParse {
        city: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Weather API response for {city} is not a JSON object")]
    NotAnObject { city: String },
}

impl FetchError {
    pub fn city(&self) -> &str {
        match self {
            FetchError::Request { city, .. }
            | FetchError::HttpStatus { city, .. }
            | FetchError::Body { city, .. }
            | FetchError::JsonParse { city, .. }
            | FetchError::NotAnObject { city } => city,
        }
    }
}
