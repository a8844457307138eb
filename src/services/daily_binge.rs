use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    catalog::Catalog,
    models::{BingeEpisode, Episode, ShowBingeResult, ShowId},
    services::{
        genre_filter::filter_by_genre,
        scoring::{log_votes, normalize_votes, rank_top, time_closeness},
    },
};

const VOTES_WEIGHT: f64 = 0.6;
const RATING_WEIGHT: f64 = 0.3;
const CLOSENESS_WEIGHT: f64 = 0.1;

/// Shows with fewer votes across the retained episodes are not recommended
pub const MIN_TOTAL_VOTES: u64 = 100;

/// Recommends shows to watch in a single sitting of `time_limit_minutes`
///
/// Each show contributes the longest run of episodes, from its first episode
/// in season/episode order, whose cumulative runtime fits the limit. Episodes
/// are never reordered to pack more content. Popularity is normalized against
/// the vote total of the whole catalog, so scores stay comparable across
/// genre filters.
pub fn select_daily_binge(
    catalog: &Catalog,
    time_limit_minutes: i64,
    genre: Option<&str>,
) -> Vec<ShowBingeResult> {
    if time_limit_minutes <= 0 {
        debug!(time_limit_minutes, "Non-positive time limit, nothing to recommend");
        return Vec::new();
    }
    let limit = time_limit_minutes as u64;

    let filtered = filter_by_genre(catalog.episodes(), genre);
    let reference = log_votes(catalog.total_votes());

    let mut by_show: BTreeMap<&ShowId, Vec<&Episode>> = BTreeMap::new();
    for episode in filtered {
        by_show.entry(&episode.show_id).or_default().push(episode);
    }
    let candidate_shows = by_show.len();

    let results: Vec<ShowBingeResult> = by_show
        .into_values()
        .filter_map(|mut episodes| {
            episodes.sort_by_key(|e| e.order_key());
            let retained = retain_within_limit(&episodes, limit);
            score_session(retained, limit, reference)
        })
        .collect();

    let eligible = results.len();
    let ranked = rank_top(results);

    debug!(
        time_limit_minutes,
        genre = ?genre,
        candidate_shows,
        eligible,
        returned = ranked.len(),
        "Daily binge selection finished"
    );

    ranked
}

/// Longest prefix whose cumulative runtime does not exceed `limit`
fn retain_within_limit<'a, 'e>(episodes: &'a [&'e Episode], limit: u64) -> &'a [&'e Episode] {
    let mut cumulative = 0u64;
    let count = episodes
        .iter()
        .take_while(|e| {
            cumulative += u64::from(e.runtime_minutes);
            cumulative <= limit
        })
        .count();
    &episodes[..count]
}

fn score_session(retained: &[&Episode], limit: u64, reference: f64) -> Option<ShowBingeResult> {
    let first = retained.first()?;

    let total_time: u64 = retained.iter().map(|e| u64::from(e.runtime_minutes)).sum();
    if total_time == 0 {
        return None;
    }

    let total_votes = retained
        .iter()
        .fold(0u64, |total, e| total.saturating_add(e.num_votes));
    if total_votes < MIN_TOTAL_VOTES {
        return None;
    }

    let avg_rating =
        retained.iter().map(|e| e.average_rating).sum::<f64>() / retained.len() as f64;
    let normalized_votes = normalize_votes(total_votes, reference);
    let closeness = time_closeness(total_time as f64, limit as f64);
    let score =
        VOTES_WEIGHT * normalized_votes + RATING_WEIGHT * avg_rating + CLOSENESS_WEIGHT * closeness;

    Some(ShowBingeResult {
        show_id: first.show_id.clone(),
        title: first.show_title.clone(),
        episodes: retained.len(),
        total_time,
        episode_list: retained.iter().map(|e| BingeEpisode::from(*e)).collect(),
        genres: first.genres.clone(),
        avg_rating,
        total_votes,
        score,
    })
}
