use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    catalog::{load_catalog, Catalog, CatalogStore},
    config::Config,
    error::AppResult,
    services::providers::{CustomSearchProvider, ImageProvider},
};

const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Shared application state
pub struct AppState {
    pub catalog: CatalogStore,
    pub catalog_path: PathBuf,
    pub image_provider: Option<Arc<dyn ImageProvider>>,
    pub image_timeout: Duration,
}

impl AppState {
    /// Creates state around an already loaded catalog, with enrichment disabled
    pub fn new(catalog: Catalog, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog: CatalogStore::new(catalog),
            catalog_path: catalog_path.into(),
            image_provider: None,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }

    pub fn with_image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.image_provider = Some(provider);
        self
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    /// Loads the catalog and wires the optional image provider from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let catalog = load_catalog(&config.catalog_path)?;
        let mut state = Self::new(catalog, &config.catalog_path)
            .with_image_timeout(Duration::from_millis(config.image_lookup_timeout_ms));

        match config.image_search_credentials() {
            Some((api_key, engine_id)) => {
                let provider =
                    CustomSearchProvider::new(api_key, engine_id, config.image_search_api_url.clone());
                tracing::info!(provider = provider.name(), "Image enrichment enabled");
                state = state.with_image_provider(Arc::new(provider));
            }
            None => tracing::info!("Image enrichment disabled, no search credentials configured"),
        }

        Ok(state)
    }
}
