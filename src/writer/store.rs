use crate::config::{StorageBackend, StorageConfig};
use crate::writer::error::WriteError;
use log::info;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use std::sync::Arc;

/// Opens the object store rooted at the configured container.
///
/// No request is made here. An access key that is not valid base64 is
/// rejected right away; a well-formed but wrong key only surfaces on upload.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, WriteError> {
    match config.backend() {
        StorageBackend::Azure {
            account,
            access_key,
        } => {
            let store = MicrosoftAzureBuilder::new()
                .with_account(account)
                .with_access_key(access_key)
                .with_container_name(config.container())
                .build()
                .map_err(|source| WriteError::AzureStore {
                    account: account.clone(),
                    container: config.container().to_string(),
                    source,
                })?;
            info!(
                "Using Azure container '{}' of account '{}'",
                config.container(),
                account
            );
            Ok(Arc::new(store))
        }
        StorageBackend::Local { root } => {
            let dir = root.join(config.container());
            std::fs::create_dir_all(&dir)
                .map_err(|e| WriteError::LocalDirCreation(dir.clone(), e))?;
            let store = LocalFileSystem::new_with_prefix(&dir)
                .map_err(|e| WriteError::LocalStore(dir.clone(), e))?;
            info!("Using local storage directory {}", dir.display());
            Ok(Arc::new(store))
        }
    }
}
