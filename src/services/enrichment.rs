use std::sync::Arc;
use std::time::Duration;

use crate::{
    models::{Enriched, Recommendation},
    services::providers::ImageProvider,
};

fn image_query(title: &str) -> String {
    format!("{} TV show", title)
}

/// Decorates ranked results with an image per show
///
/// Lookups run in parallel, each bounded by `timeout`. A missing provider,
/// a failed lookup or a timeout leaves `image_url` empty; order and scores
/// are never touched.
pub async fn enrich_with_images<T: Recommendation>(
    provider: Option<Arc<dyn ImageProvider>>,
    results: Vec<T>,
    timeout: Duration,
) -> Vec<Enriched<T>> {
    let Some(provider) = provider else {
        return results.into_iter().map(Enriched::bare).collect();
    };

    let tasks: Vec<_> = results
        .iter()
        .map(|result| {
            let provider = provider.clone();
            let query = image_query(result.title());
            tokio::spawn(async move {
                tokio::time::timeout(timeout, provider.find_image(&query)).await
            })
        })
        .collect();

    let mut enriched = Vec::with_capacity(results.len());
    let mut misses = 0usize;

    for (recommendation, task) in results.into_iter().zip(tasks) {
        let image_url = match task.await {
            Ok(Ok(Ok(url))) => url,
            Ok(Ok(Err(e))) => {
                tracing::warn!(
                    show_id = %recommendation.show_id(),
                    provider = provider.name(),
                    error = %e,
                    "Image lookup failed"
                );
                None
            }
            Ok(Err(_)) => {
                tracing::warn!(
                    show_id = %recommendation.show_id(),
                    provider = provider.name(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Image lookup timed out"
                );
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Image lookup task join error");
                None
            }
        };

        if image_url.is_none() {
            misses += 1;
        }
        enriched.push(Enriched {
            recommendation,
            image_url,
        });
    }

    tracing::debug!(
        results = enriched.len(),
        misses,
        provider = provider.name(),
        "Image enrichment finished"
    );

    enriched
}
