//! Persists a [`WeatherBatch`] as one Parquet object in the storage container.

pub mod error;
pub mod frame;
pub mod store;

use crate::config::StorageConfig;
use crate::types::batch::WeatherBatch;
use crate::types::storage_target::StorageTarget;
use crate::writer::error::WriteError;
use crate::writer::frame::batch_to_frame;
use chrono::{DateTime, Utc};
use log::{info, warn};
use object_store::{ObjectStore, PutPayload};
use polars::prelude::{ParquetCompression, ParquetWriter};
use std::sync::Arc;
use tokio::task;

/// What a call to [`Writer::write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The batch was empty; nothing was uploaded.
    Skipped,
    /// The batch was uploaded to this target.
    Uploaded(StorageTarget),
}

/// Where a [`Writer`] gets its store from.
#[derive(Debug, Clone)]
enum StoreSource {
    Opened(Arc<dyn ObjectStore>),
    /// Opened again on every write, so a bad credential fails that run only.
    Configured(StorageConfig),
}

#[derive(Debug, Clone)]
pub struct Writer {
    source: StoreSource,
    container: String,
}

impl Writer {
    /// Wraps an already opened store. `container` is only used to label the
    /// resulting [`StorageTarget`]; the store itself is expected to be rooted
    /// at that container.
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self {
            source: StoreSource::Opened(store),
            container: container.into(),
        }
    }

    /// Defers opening the store to each [`Writer::write`] call.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            source: StoreSource::Configured(config.clone()),
            container: config.container().to_string(),
        }
    }

    fn store(&self) -> Result<Arc<dyn ObjectStore>, WriteError> {
        match &self.source {
            StoreSource::Opened(store) => Ok(Arc::clone(store)),
            StoreSource::Configured(config) => store::open_store(config),
        }
    }

    /// Encodes `batch` and uploads it under the key derived from `started_at`.
    ///
    /// An empty batch is a no-op. An existing object at the same key is
    /// overwritten; since encoding is deterministic, repeating a write with the
    /// same batch and timestamp leaves exactly the same single object behind.
    pub async fn write(
        &self,
        batch: WeatherBatch,
        started_at: DateTime<Utc>,
    ) -> Result<WriteOutcome, WriteError> {
        if batch.is_empty() {
            warn!("No weather data collected from any city.");
            return Ok(WriteOutcome::Skipped);
        }

        let store = self.store()?;
        let bytes = task::spawn_blocking(move || encode_parquet(&batch)).await??;

        let target = StorageTarget::for_run(self.container.as_str(), started_at);
        store
            .put(&target.object_path(), PutPayload::from(bytes))
            .await
            .map_err(|source| WriteError::Upload {
                target: target.to_string(),
                source,
            })?;

        info!(
            "Weather data successfully uploaded to storage at {}.",
            target.key()
        );
        Ok(WriteOutcome::Uploaded(target))
    }
}

/// Builds the batch's table (including `ifUK`) and encodes it as Snappy
/// compressed Parquet in memory.
pub fn encode_parquet(batch: &WeatherBatch) -> Result<Vec<u8>, WriteError> {
    let mut df = batch_to_frame(batch)?;
    let mut buffer = Vec::new();
    ParquetWriter::new(&mut buffer)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)
        .map_err(|source| WriteError::ParquetEncode {
            records: batch.len(),
            source,
        })?;
    Ok(buffer)
}
