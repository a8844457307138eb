use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod recommendation;

pub use recommendation::{
    BingeEpisode, Enriched, Recommendation, ShowAggregate, ShowAggregateResult, ShowBingeResult,
};

/// Identifier of a show (the IMDb `parentTconst`, e.g. "tt0903747")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub String);

impl Display for ShowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ShowId {
    fn from(id: &str) -> Self {
        ShowId(id.to_string())
    }
}

/// One row of the episode catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_id: String,
    pub show_id: ShowId,
    pub episode_title: String,
    pub show_title: String,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub runtime_minutes: u32,
    /// Comma-separated genre tags, shared by every episode of a show
    pub genres: String,
    pub average_rating: f64,
    pub num_votes: u64,
    /// Derived by [`crate::catalog::Catalog::new`]; any value set before that is overwritten
    pub is_finale_of_season: bool,
}

impl Episode {
    /// Narrative ordering key; unknown season or episode numbers sort last
    pub fn order_key(&self) -> (bool, Option<u32>, bool, Option<u32>) {
        (
            self.season_number.is_none(),
            self.season_number,
            self.episode_number.is_none(),
            self.episode_number,
        )
    }
}

/// Statistics about the active catalog snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSummary {
    pub episodes: usize,
    pub shows: usize,
    pub total_votes: u64,
    pub loaded_at: DateTime<Utc>,
}
