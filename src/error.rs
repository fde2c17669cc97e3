use crate::config::ConfigError;
use thiserror::Error;

/// Failures that stop the process before any run starts.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
