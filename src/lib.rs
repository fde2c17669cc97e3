//! Scheduled weather collection: fetch the current weather for a list of
//! cities, flatten it into one table and store each batch as a Parquet object
//! keyed `<YYYY-MM-DD>/<HH-MM-SS>/weather_data.parquet`.

mod collector;
mod config;
mod error;
mod job;
mod schedule;
mod types;
mod utils;
mod writer;

pub use collector::error::FetchError;
pub use collector::flatten::{flatten_object, FIELD_SEPARATOR};
pub use collector::{Collector, DEFAULT_BASE_URL};
pub use config::{
    ApiConfig, Config, ConfigError, ScheduleConfig, StorageBackend, StorageConfig,
    DEFAULT_CITIES, DEFAULT_CONTAINER,
};
pub use error::CollectorError;
pub use job::{Job, RunError, RunOutcome};
pub use schedule::{following_slot, is_past_due, next_boundary, Scheduler};
pub use utils::error_chain;
pub use writer::error::WriteError;
pub use writer::frame::{batch_to_frame, IF_UK_COLUMN};
pub use writer::store::open_store;
pub use writer::{encode_parquet, WriteOutcome, Writer};

pub use types::batch::WeatherBatch;
pub use types::record::{CityWeatherRecord, CITY_FIELD, COUNTRY_CODE_FIELD};
pub use types::storage_target::{StorageTarget, OBJECT_FILE_NAME};
