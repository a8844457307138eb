use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    catalog::Catalog,
    models::{Episode, ShowAggregate, ShowAggregateResult, ShowId},
    services::{
        genre_filter::filter_by_genre,
        scoring::{log_votes, normalize_votes, rank_top, time_closeness},
    },
};

const RATING_WEIGHT: f64 = 0.2;
const CLOSENESS_WEIGHT: f64 = 0.4;
const EPISODE_COUNT_WEIGHT: f64 = 0.1;
const VOTES_WEIGHT: f64 = 0.3;

/// A show must fill at least this share of the schedule to be viable
pub const MIN_FILL_RATIO: f64 = 0.8;

/// Running totals for one show
#[derive(Default)]
struct ShowAccumulator<'a> {
    first: Option<&'a Episode>,
    total_runtime_minutes: u64,
    episode_count: usize,
    rating_sum: f64,
    total_votes: u64,
}

impl<'a> ShowAccumulator<'a> {
    fn add(&mut self, episode: &'a Episode) {
        self.first.get_or_insert(episode);
        self.total_runtime_minutes += u64::from(episode.runtime_minutes);
        self.episode_count += 1;
        self.rating_sum += episode.average_rating;
        self.total_votes = self.total_votes.saturating_add(episode.num_votes);
    }

    fn finish(self) -> Option<ShowAggregate> {
        let first = self.first?;
        Some(ShowAggregate {
            show_id: first.show_id.clone(),
            show_title: first.show_title.clone(),
            total_runtime_minutes: self.total_runtime_minutes,
            episode_count: self.episode_count,
            average_rating: self.rating_sum / self.episode_count as f64,
            total_votes: self.total_votes,
            genres: first.genres.clone(),
        })
    }
}

/// Groups episodes into per-show totals, ordered by show id
pub fn build_show_aggregates(episodes: &[&Episode]) -> Vec<ShowAggregate> {
    let mut shows: BTreeMap<&ShowId, ShowAccumulator> = BTreeMap::new();
    for &episode in episodes {
        shows.entry(&episode.show_id).or_default().add(episode);
    }

    shows
        .into_values()
        .filter_map(ShowAccumulator::finish)
        .collect()
}

/// Recommends whole shows that can be finished in `total_days` days of `minutes_per_day`
///
/// Viable shows run no longer than the schedule and fill at least 80% of it.
/// Popularity is normalized against the most-voted viable show of this request.
pub fn select_full_completion(
    catalog: &Catalog,
    total_days: i64,
    minutes_per_day: i64,
    genre: Option<&str>,
) -> Vec<ShowAggregateResult> {
    if total_days <= 0 || minutes_per_day <= 0 {
        debug!(
            total_days,
            minutes_per_day, "Non-positive schedule, nothing to recommend"
        );
        return Vec::new();
    }

    let target_total = total_days.saturating_mul(minutes_per_day) as f64;
    let min_acceptable = MIN_FILL_RATIO * target_total;

    let filtered = filter_by_genre(catalog.episodes(), genre);
    let shows = build_show_aggregates(&filtered);
    let candidate_shows = shows.len();

    let viable: Vec<ShowAggregate> = shows
        .into_iter()
        .filter(|show| {
            let runtime = show.total_runtime_minutes as f64;
            min_acceptable <= runtime && runtime <= target_total
        })
        .collect();

    let reference = viable
        .iter()
        .map(|show| log_votes(show.total_votes))
        .fold(0.0, f64::max);

    let results: Vec<ShowAggregateResult> = viable
        .into_iter()
        .map(|show| {
            let runtime = show.total_runtime_minutes as f64;
            let normalized_votes = normalize_votes(show.total_votes, reference);
            let closeness = time_closeness(runtime, target_total);
            let score = RATING_WEIGHT * show.average_rating
                + CLOSENESS_WEIGHT * closeness
                + EPISODE_COUNT_WEIGHT * show.episode_count as f64
                + VOTES_WEIGHT * normalized_votes;

            ShowAggregateResult {
                daily_time: runtime / total_days as f64,
                normalized_votes,
                time_closeness: closeness,
                score,
                show,
            }
        })
        .collect();

    let viable_shows = results.len();
    let ranked = rank_top(results);

    debug!(
        total_days,
        minutes_per_day,
        genre = ?genre,
        candidate_shows,
        viable_shows,
        returned = ranked.len(),
        "Full completion selection finished"
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::episode;
    use crate::services::scoring::{is_ranked, MAX_RECOMMENDATIONS};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// A show of `count` episodes of `runtime` minutes each
    fn show(id: &str, count: u32, runtime: u32, rating: f64, votes: u64) -> Vec<Episode> {
        (1..=count)
            .map(|n| episode(id, 1, n, runtime, rating, votes))
            .collect()
    }

    #[test]
    fn test_build_show_aggregates() {
        let catalog = Catalog::new(vec![
            episode("tt1", 1, 1, 30, 7.0, 100),
            episode("tt2", 1, 1, 45, 9.0, 10),
            episode("tt1", 1, 2, 40, 8.0, 300),
        ]);
        let episodes: Vec<&Episode> = catalog.episodes().iter().collect();

        let shows = build_show_aggregates(&episodes);
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].show_id, ShowId::from("tt1"));
        assert_eq!(shows[0].total_runtime_minutes, 70);
        assert_eq!(shows[0].episode_count, 2);
        assert!(close(shows[0].average_rating, 7.5));
        assert_eq!(shows[0].total_votes, 400);
        assert_eq!(shows[0].show_title, "Show tt1");
        assert_eq!(shows[1].total_runtime_minutes, 45);
    }

    #[test]
    fn test_aggregate_votes_saturate() {
        let catalog = Catalog::new(show("tt1", 3, 30, 8.0, u64::MAX));
        let episodes: Vec<&Episode> = catalog.episodes().iter().collect();

        let shows = build_show_aggregates(&episodes);
        assert_eq!(shows[0].total_votes, u64::MAX);
    }

    #[test]
    fn test_show_longer_than_schedule_is_excluded() {
        let catalog = Catalog::new(show("tt1", 10, 60, 8.0, 100));
        // target 500, floor 400
        assert!(select_full_completion(&catalog, 5, 100, None).is_empty());
    }

    #[test]
    fn test_show_within_band_is_included() {
        let catalog = Catalog::new(show("tt1", 10, 60, 8.0, 100));

        // target 750, floor 600
        let results = select_full_completion(&catalog, 5, 150, None);
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.show.total_runtime_minutes, 600);
        assert!(close(result.daily_time, 120.0));
        assert!(close(result.time_closeness, 0.8));
        // Only viable show, so it sets the normalization max
        assert!(close(result.normalized_votes, 1.0));
        let expected = 0.2 * 8.0 + 0.4 * 0.8 + 0.1 * 10.0 + 0.3 * 1.0;
        assert!(close(result.score, expected));
    }

    #[test]
    fn test_show_that_finishes_too_early_is_excluded() {
        let catalog = Catalog::new(show("tt1", 2, 30, 9.0, 1000));
        // 60 minutes against a 100-minute floor
        assert!(select_full_completion(&catalog, 5, 25, None).is_empty());
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let catalog = Catalog::new(
            [show("tt1", 4, 100, 7.0, 50), show("tt2", 5, 100, 7.0, 50)].concat(),
        );

        // target 500, floor 400: both edges included
        let results = select_full_completion(&catalog, 5, 100, None);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_non_positive_schedule_is_empty() {
        let catalog = Catalog::new(show("tt1", 10, 60, 8.0, 100));
        assert!(select_full_completion(&catalog, 0, 150, None).is_empty());
        assert!(select_full_completion(&catalog, 5, 0, None).is_empty());
        assert!(select_full_completion(&catalog, -1, 150, None).is_empty());
        assert!(select_full_completion(&catalog, 5, -150, None).is_empty());
    }

    #[test]
    fn test_votes_normalized_against_viable_max() {
        let catalog = Catalog::new(
            [
                show("tt1", 5, 100, 7.0, 20),
                show("tt2", 5, 95, 7.0, 2),
                // Huge vote count but far too long, so it must not set the max
                show("tt3", 50, 100, 7.0, 1_000_000),
            ]
            .concat(),
        );

        let results = select_full_completion(&catalog, 5, 100, None);
        assert_eq!(results.len(), 2);

        let tt1 = results.iter().find(|r| r.show.show_id.0 == "tt1").unwrap();
        let tt2 = results.iter().find(|r| r.show.show_id.0 == "tt2").unwrap();
        assert!(close(tt1.normalized_votes, 1.0));
        assert!(close(tt2.normalized_votes, 11f64.ln() / 101f64.ln()));
    }

    #[test]
    fn test_zero_votes_normalize_to_zero() {
        let catalog = Catalog::new(show("tt1", 5, 100, 7.0, 0));

        let results = select_full_completion(&catalog, 5, 100, None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].normalized_votes, 0.0);
    }

    #[test]
    fn test_genre_filter_applies_before_aggregation() {
        let mut comedy = show("tt1", 5, 100, 7.0, 100);
        for e in comedy.iter_mut() {
            e.genres = "Comedy,Romance".to_string();
        }
        let catalog = Catalog::new([comedy, show("tt2", 5, 100, 9.0, 100)].concat());

        let results = select_full_completion(&catalog, 5, 100, Some("romance"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].show.show_id.0, "tt1");
        assert_eq!(results[0].show.genres, "Comedy,Romance");
    }

    #[test]
    fn test_results_are_bounded_ranked_and_in_band() {
        let episodes: Vec<Episode> = (0..9u32)
            .flat_map(|i| {
                show(
                    &format!("tt{}", i),
                    6 + i % 3,
                    70 + i,
                    5.0 + f64::from(i) * 0.3,
                    u64::from(i) * 40,
                )
            })
            .collect();
        let catalog = Catalog::new(episodes);

        let (days, per_day) = (4, 150);
        let results = select_full_completion(&catalog, days, per_day, None);

        assert!(!results.is_empty());
        assert!(results.len() <= MAX_RECOMMENDATIONS);
        assert!(is_ranked(&results));
        let target = (days * per_day) as f64;
        for result in &results {
            let runtime = result.show.total_runtime_minutes as f64;
            assert!(0.8 * target <= runtime && runtime <= target);
        }
    }

    #[test]
    fn test_idempotent() {
        let catalog = Catalog::new(
            [
                show("tt1", 5, 100, 7.0, 20),
                show("tt2", 5, 95, 7.0, 2),
                show("tt3", 4, 110, 8.0, 200),
            ]
            .concat(),
        );
        assert_eq!(
            select_full_completion(&catalog, 5, 100, None),
            select_full_completion(&catalog, 5, 100, None)
        );
    }
}
