use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Enriched, ShowAggregateResult, ShowBingeResult},
    routes::AppState,
    services::{enrich_with_images, select_daily_binge, select_full_completion},
};

#[derive(Debug, Deserialize)]
pub struct DailyBingeRequest {
    #[serde(default)]
    pub genre: Option<String>,
    /// Session length in minutes; takes precedence over hours/minutes
    pub time_limit_minutes: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
}

impl DailyBingeRequest {
    /// Resolves the session length in minutes
    pub fn time_limit(&self) -> AppResult<i64> {
        if let Some(limit) = self.time_limit_minutes {
            return Ok(limit);
        }

        match (self.hours, self.minutes) {
            (None, None) => Err(AppError::InvalidInput(
                "Provide time_limit_minutes or hours/minutes".to_string(),
            )),
            (hours, minutes) => Ok(hours
                .unwrap_or(0)
                .saturating_mul(60)
                .saturating_add(minutes.unwrap_or(0))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FullCompletionRequest {
    pub total_days: i64,
    pub minutes_per_day: i64,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Blank genre input means "any genre"
fn genre_query(genre: &Option<String>) -> Option<&str> {
    genre.as_deref().map(str::trim).filter(|g| !g.is_empty())
}

/// Handler for daily binge recommendations
pub async fn daily_binge(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<DailyBingeRequest>,
) -> AppResult<Json<Vec<Enriched<ShowBingeResult>>>> {
    let time_limit = request.time_limit()?;
    let genre = genre_query(&request.genre);

    tracing::info!(
        request_id = %request_id,
        time_limit_minutes = time_limit,
        genre = ?genre,
        "Processing daily binge request"
    );

    let catalog = state.catalog.snapshot().await;
    let ranked = select_daily_binge(&catalog, time_limit, genre);
    let results =
        enrich_with_images(state.image_provider.clone(), ranked, state.image_timeout).await;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Daily binge recommendations ready"
    );

    Ok(Json(results))
}

/// Handler for full completion recommendations
pub async fn full_completion(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<FullCompletionRequest>,
) -> AppResult<Json<Vec<Enriched<ShowAggregateResult>>>> {
    let genre = genre_query(&request.genre);

    tracing::info!(
        request_id = %request_id,
        total_days = request.total_days,
        minutes_per_day = request.minutes_per_day,
        genre = ?genre,
        "Processing full completion request"
    );

    let catalog = state.catalog.snapshot().await;
    let ranked = select_full_completion(
        &catalog,
        request.total_days,
        request.minutes_per_day,
        genre,
    );
    let results =
        enrich_with_images(state.image_provider.clone(), ranked, state.image_timeout).await;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Full completion recommendations ready"
    );

    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(limit: Option<i64>, hours: Option<i64>, minutes: Option<i64>) -> DailyBingeRequest {
        DailyBingeRequest {
            genre: None,
            time_limit_minutes: limit,
            hours,
            minutes,
        }
    }

    #[test]
    fn test_time_limit_prefers_explicit_minutes() {
        assert_eq!(request(Some(45), Some(2), Some(0)).time_limit().unwrap(), 45);
    }

    #[test]
    fn test_time_limit_from_hours_and_minutes() {
        assert_eq!(request(None, Some(2), Some(15)).time_limit().unwrap(), 135);
        assert_eq!(request(None, Some(1), None).time_limit().unwrap(), 60);
        assert_eq!(request(None, None, Some(40)).time_limit().unwrap(), 40);
    }

    #[test]
    fn test_time_limit_missing() {
        let result = request(None, None, None).time_limit();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_genre_query() {
        assert_eq!(genre_query(&Some(" Comedy ".to_string())), Some("Comedy"));
        assert_eq!(genre_query(&Some("   ".to_string())), None);
        assert_eq!(genre_query(&None), None);
    }
}
