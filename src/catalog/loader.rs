use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{Episode, ShowId},
};

use super::Catalog;

/// Columns that must be present; both naming schemes are accepted
const REQUIRED_COLUMNS: [(&str, &str); 3] = [
    ("episodeId", "tconst"),
    ("parentShowId", "parentTconst"),
    ("runtimeMinutes", "runtimeMinutes"),
];

const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

/// Raw catalog row as written by the preprocessing step
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "episodeId", alias = "tconst")]
    episode_id: String,
    #[serde(rename = "parentShowId", alias = "parentTconst")]
    parent_show_id: String,
    #[serde(rename = "episodeTitle", alias = "primaryTitle", default)]
    episode_title: Option<String>,
    #[serde(rename = "showTitle", alias = "seriesTitle", default)]
    show_title: Option<String>,
    #[serde(rename = "seasonNumber", default, deserialize_with = "lenient_u32")]
    season_number: Option<u32>,
    #[serde(rename = "episodeNumber", default, deserialize_with = "lenient_u32")]
    episode_number: Option<u32>,
    #[serde(rename = "runtimeMinutes", default, deserialize_with = "lenient_u32")]
    runtime_minutes: Option<u32>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(rename = "averageRating", default, deserialize_with = "lenient_rating")]
    average_rating: Option<f64>,
    #[serde(rename = "numVotes", default, deserialize_with = "lenient_u64")]
    num_votes: Option<u64>,
}

impl CatalogRow {
    /// Converts to an episode; rows without a runtime never reach the engine
    fn into_episode(self) -> Option<Episode> {
        let runtime_minutes = self.runtime_minutes?;
        let episode_title = self.episode_title.unwrap_or_default();
        let show_title = self
            .show_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| episode_title.clone());

        Some(Episode {
            episode_id: self.episode_id,
            show_id: ShowId(self.parent_show_id),
            episode_title,
            show_title,
            season_number: self.season_number,
            episode_number: self.episode_number,
            runtime_minutes,
            genres: self.genres.unwrap_or_default(),
            average_rating: self.average_rating.unwrap_or(0.0),
            num_votes: self.num_votes.unwrap_or(0),
            is_finale_of_season: false,
        })
    }
}

/// Loads the episode catalog from a CSV file
///
/// A missing or unreadable file surfaces as `CatalogUnavailable`; individual
/// malformed rows are skipped and counted.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> AppResult<Catalog> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading catalog");

    let file = File::open(path).map_err(|e| {
        AppError::CatalogUnavailable(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let catalog = read_catalog(file)?;

    info!(
        path = %path.display(),
        episodes = catalog.len(),
        shows = catalog.show_count(),
        total_votes = catalog.total_votes(),
        "Catalog loaded"
    );

    Ok(catalog)
}

/// Reads catalog rows from any CSV source
pub fn read_catalog<R: Read>(source: R) -> AppResult<Catalog> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let headers = reader.headers()?.clone();
    for (name, alias) in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name || h == alias) {
            return Err(AppError::CatalogUnavailable(format!(
                "Catalog is missing required column {}",
                name
            )));
        }
    }

    let mut episodes = Vec::new();
    let mut seen: HashSet<(String, u32, u32)> = HashSet::new();
    let mut malformed = 0usize;
    let mut missing_runtime = 0usize;
    let mut duplicates = 0usize;

    for (line, result) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!(line = line + 2, error = %e, "Skipping malformed catalog row");
                malformed += 1;
                continue;
            }
        };

        let Some(episode) = row.into_episode() else {
            missing_runtime += 1;
            continue;
        };

        if let (Some(season), Some(number)) = (episode.season_number, episode.episode_number) {
            if !seen.insert((episode.show_id.0.clone(), season, number)) {
                warn!(
                    show_id = %episode.show_id,
                    season,
                    episode = number,
                    episode_id = %episode.episode_id,
                    "Duplicate episode position, keeping the first row"
                );
                duplicates += 1;
                continue;
            }
        }

        episodes.push(episode);
    }

    if malformed > 0 || missing_runtime > 0 || duplicates > 0 {
        warn!(
            malformed,
            missing_runtime,
            duplicates,
            kept = episodes.len(),
            "Skipped catalog rows"
        );
    }

    Ok(Catalog::new(episodes))
}

fn is_null(value: &str) -> bool {
    value.is_empty() || value == "\\N" || value.eq_ignore_ascii_case("nan")
}

/// Parses a non-negative whole number, accepting integral floats like "3.0"
fn parse_count(raw: Option<&str>) -> Result<Option<u64>, String> {
    let value = match raw.map(str::trim) {
        Some(v) if !is_null(v) => v,
        _ => return Ok(None),
    };

    if let Ok(n) = value.parse::<u64>() {
        return Ok(Some(n));
    }

    let float: f64 = value
        .parse()
        .map_err(|_| format!("invalid count {:?}", value))?;
    // u64::MAX rounds up to 2^64 as a float, so anything at or above it would saturate
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float < u64::MAX as f64 {
        Ok(Some(float as u64))
    } else {
        Err(format!("invalid count {:?}", value))
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    parse_count(raw.as_deref()).map_err(serde::de::Error::custom)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match lenient_u64(deserializer)? {
        Some(n) => u32::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("value {} out of range", n))),
        None => Ok(None),
    }
}

/// Parses an IMDb rating, which must lie within 0 to 10
fn parse_rating(raw: Option<&str>) -> Result<Option<f64>, String> {
    let value = match raw.map(str::trim) {
        Some(v) if !is_null(v) => v,
        _ => return Ok(None),
    };

    match value.parse::<f64>() {
        Ok(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(Some(rating)),
        _ => Err(format!("invalid rating {:?}", value)),
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    parse_rating(raw.as_deref()).map_err(serde::de::Error::custom)
}
