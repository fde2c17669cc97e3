use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to build a table from {records} weather records")]
    FrameBuild {
        records: usize,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to derive column '{column}'")]
    DeriveColumn {
        column: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Encoding error writing parquet for {records} weather records")]
    ParquetEncode {
        records: usize,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to upload '{target}'")]
    Upload {
        target: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to open Azure container '{container}' of account '{account}'")]
    AzureStore {
        account: String,
        container: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to create local storage directory '{0}'")]
    LocalDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to open local storage directory '{0}'")]
    LocalStore(PathBuf, #[source] object_store::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
