//! One collect-then-write run, and the run-level error scope around it.

use crate::collector::Collector;
use crate::config::Config;
use crate::types::storage_target::StorageTarget;
use crate::utils::error_chain;
use crate::writer::error::WriteError;
use crate::writer::{WriteOutcome, Writer};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{error, info};
use std::sync::Arc;
use thiserror::Error;

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every city failed, nothing was uploaded.
    NoData,
    /// The batch was uploaded to this target.
    Uploaded(StorageTarget),
}

/// A failure that ends the whole run. Per-city failures never get here.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to write weather batch")]
    Write(#[from] WriteError),

    #[error("Run task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct Job {
    collector: Collector,
    writer: Writer,
}

impl Job {
    pub fn new(collector: Collector, writer: Writer) -> Self {
        Self { collector, writer }
    }

    /// Wires a collector and a writer from `config`. The store is opened inside
    /// each run, so any storage credential problem fails that run only.
    pub fn from_config(config: &Config) -> Self {
        let collector = Collector::builder()
            .cities(config.api.cities.clone())
            .api_key(config.api.api_key.clone())
            .base_url(config.api.base_url.clone())
            .build();
        Self::new(collector, Writer::from_config(&config.storage))
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn writer(&self) -> &Writer {
        &self.writer
    }

    /// Collects every city, then writes the batch keyed by `started_at`.
    pub async fn run_once(&self, started_at: DateTime<Utc>) -> Result<RunOutcome, RunError> {
        let batch = self.collector.collect().await;
        info!(
            "Collected weather for {} of {} cities",
            batch.len(),
            self.collector.cities().len()
        );

        Ok(match self.writer.write(batch, started_at).await? {
            WriteOutcome::Skipped => RunOutcome::NoData,
            WriteOutcome::Uploaded(target) => RunOutcome::Uploaded(target),
        })
    }

    /// Runs once and absorbs any run-level failure, panics included.
    ///
    /// The failure is logged and `None` returned; nothing is retried.
    pub async fn tick(self: &Arc<Self>, started_at: DateTime<Utc>) -> Option<RunOutcome> {
        info!(
            "Weather collection run started at {}",
            started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let job = Arc::clone(self);
        let result = match tokio::spawn(async move { job.run_once(started_at).await }).await {
            Ok(result) => result,
            Err(e) => Err(RunError::from(e)),
        };

        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("An error occurred during execution: {}", error_chain(&e));
                None
            }
        }
    }
}
