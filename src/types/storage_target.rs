//! Where a run's Parquet object lands in the storage container.

use chrono::{DateTime, Utc};
use object_store::path::Path;
use std::fmt;

/// File name of the object written by every run.
pub const OBJECT_FILE_NAME: &str = "weather_data.parquet";

const DATE_PARTITION_FORMAT: &str = "%Y-%m-%d";
const TIME_PARTITION_FORMAT: &str = "%H-%M-%S";

/// Container and key of a run's output object.
///
/// The key is partitioned by the run's start time as
/// `<YYYY-MM-DD>/<HH-MM-SS>/weather_data.parquet`, so two runs only share a
/// key when they start within the same second.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use weather_collector::StorageTarget;
///
/// let started_at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 30, 0).unwrap();
/// let target = StorageTarget::for_run("weatherparquet", started_at);
/// assert_eq!(target.key(), "2024-03-09/07-30-00/weather_data.parquet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageTarget {
    container: String,
    key: String,
}

impl StorageTarget {
    pub fn for_run(container: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            container: container.into(),
            key: partition_key(started_at),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key as an `object_store` location, relative to the container.
    pub fn object_path(&self) -> Path {
        Path::from(self.key.as_str())
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

fn partition_key(started_at: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}",
        started_at.format(DATE_PARTITION_FORMAT),
        started_at.format(TIME_PARTITION_FORMAT),
        OBJECT_FILE_NAME
    )
}
