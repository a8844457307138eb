use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

use super::{load_catalog, Catalog};

/// Holder of the active catalog snapshot
///
/// Readers clone the inner `Arc` and release the lock immediately, so a
/// reload never blocks on (or disturbs) requests already in flight.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Returns the snapshot active at the time of the call
    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// Installs a new snapshot and returns the one it replaced
    pub async fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, next)
    }

    /// Loads a catalog file off the async runtime, then swaps it in
    ///
    /// On failure the previous snapshot stays active.
    pub async fn reload_from(&self, path: impl Into<PathBuf>) -> AppResult<Arc<Catalog>> {
        let path = path.into();
        let catalog = tokio::task::spawn_blocking(move || load_catalog(path))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

        let previous = self.replace(catalog).await;
        let current = self.snapshot().await;

        tracing::info!(
            previous_episodes = previous.len(),
            episodes = current.len(),
            shows = current.show_count(),
            "Catalog snapshot replaced"
        );

        Ok(current)
    }
}
