use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::models::{CatalogSummary, Episode, ShowId};

pub mod loader;
pub mod store;

pub use loader::load_catalog;
pub use store::CatalogStore;

/// Immutable episode table shared by every recommendation request
#[derive(Debug, Clone)]
pub struct Catalog {
    episodes: Vec<Episode>,
    total_votes: u64,
    show_count: usize,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Builds a snapshot, deriving the finale flag for every episode
    pub fn new(mut episodes: Vec<Episode>) -> Self {
        mark_season_finales(&mut episodes);

        let total_votes = episodes
            .iter()
            .fold(0u64, |total, e| total.saturating_add(e.num_votes));
        let show_count = episodes
            .iter()
            .map(|e| &e.show_id)
            .collect::<HashSet<_>>()
            .len();

        Self {
            episodes,
            total_votes,
            show_count,
            loaded_at: Utc::now(),
        }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Sum of votes across the whole, unfiltered catalog
    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn show_count(&self) -> usize {
        self.show_count
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            episodes: self.len(),
            shows: self.show_count,
            total_votes: self.total_votes,
            loaded_at: self.loaded_at,
        }
    }
}

/// An episode is a finale iff it has the highest episode number in its (show, season).
/// Rows with an unknown season or episode number are never finales.
fn mark_season_finales(episodes: &mut [Episode]) {
    let finales: Vec<bool> = {
        let mut last_episode: HashMap<(&ShowId, u32), u32> = HashMap::new();
        for episode in episodes.iter() {
            if let (Some(season), Some(number)) = (episode.season_number, episode.episode_number) {
                let max = last_episode
                    .entry((&episode.show_id, season))
                    .or_insert(number);
                *max = (*max).max(number);
            }
        }

        episodes
            .iter()
            .map(|episode| match (episode.season_number, episode.episode_number) {
                (Some(season), Some(number)) => {
                    last_episode.get(&(&episode.show_id, season)) == Some(&number)
                }
                _ => false,
            })
            .collect()
    };

    for (episode, is_finale) in episodes.iter_mut().zip(finales) {
        episode.is_finale_of_season = is_finale;
    }
}
