use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::CatalogSummary,
    routes::AppState,
};

/// Statistics about the active catalog snapshot
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<CatalogSummary> {
    Json(state.catalog.snapshot().await.summary())
}

/// Reloads the catalog file and swaps in the new snapshot
pub async fn reload(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<CatalogSummary>> {
    tracing::info!(
        request_id = %request_id,
        path = %state.catalog_path.display(),
        "Reloading catalog"
    );

    let catalog = state
        .catalog
        .reload_from(state.catalog_path.clone())
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Catalog reload failed");
            e
        })?;

    Ok(Json(catalog.summary()))
}
