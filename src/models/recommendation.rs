use serde::{Deserialize, Serialize};

use super::{Episode, ShowId};

/// Common view over ranked results, used for ordering and enrichment
pub trait Recommendation {
    fn show_id(&self) -> &ShowId;
    fn title(&self) -> &str;
    fn score(&self) -> f64;
}

/// A retained episode inside a daily binge recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BingeEpisode {
    pub episode_id: String,
    pub episode_title: String,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub runtime_minutes: u32,
    pub average_rating: f64,
    pub is_finale_of_season: bool,
}

impl From<&Episode> for BingeEpisode {
    fn from(episode: &Episode) -> Self {
        Self {
            episode_id: episode.episode_id.clone(),
            episode_title: episode.episode_title.clone(),
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            runtime_minutes: episode.runtime_minutes,
            average_rating: episode.average_rating,
            is_finale_of_season: episode.is_finale_of_season,
        }
    }
}

/// A show recommended for a single viewing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowBingeResult {
    pub show_id: ShowId,
    pub title: String,
    /// Number of retained episodes
    pub episodes: usize,
    /// Runtime of the retained episodes, in minutes
    pub total_time: u64,
    /// Retained episodes in narrative order
    pub episode_list: Vec<BingeEpisode>,
    pub genres: String,
    pub avg_rating: f64,
    pub total_votes: u64,
    pub score: f64,
}

impl Recommendation for ShowBingeResult {
    fn show_id(&self) -> &ShowId {
        &self.show_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn score(&self) -> f64 {
        self.score
    }
}

/// Per-show totals over a (possibly genre-filtered) set of episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowAggregate {
    pub show_id: ShowId,
    pub show_title: String,
    pub total_runtime_minutes: u64,
    pub episode_count: usize,
    pub average_rating: f64,
    pub total_votes: u64,
    pub genres: String,
}

/// A show recommended for completion within a multi-day schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowAggregateResult {
    #[serde(flatten)]
    pub show: ShowAggregate,
    /// Minutes per day needed to finish within the requested number of days
    pub daily_time: f64,
    pub normalized_votes: f64,
    pub time_closeness: f64,
    pub score: f64,
}

impl Recommendation for ShowAggregateResult {
    fn show_id(&self) -> &ShowId {
        &self.show.show_id
    }

    fn title(&self) -> &str {
        &self.show.show_title
    }

    fn score(&self) -> f64 {
        self.score
    }
}

/// A ranked result decorated with an optional image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enriched<T> {
    #[serde(flatten)]
    pub recommendation: T,
    pub image_url: Option<String>,
}

impl<T> Enriched<T> {
    pub fn bare(recommendation: T) -> Self {
        Self {
            recommendation,
            image_url: None,
        }
    }
}
