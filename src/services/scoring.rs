//! Scoring helpers shared by both selectors.

use crate::models::Recommendation;

/// Maximum number of recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Log-scaled popularity, `ln(1 + votes)`
pub fn log_votes(votes: u64) -> f64 {
    (votes as f64).ln_1p()
}

/// Scales `log_votes(votes)` by a reference log value; zero when the reference is not positive
pub fn normalize_votes(votes: u64, reference: f64) -> f64 {
    if reference > 0.0 {
        log_votes(votes) / reference
    } else {
        0.0
    }
}

/// `1 - |actual - target| / target`; 1.0 is an exact fit
///
/// `target` must be positive. Large overshoots go negative.
pub fn time_closeness(actual: f64, target: f64) -> f64 {
    1.0 - (actual - target).abs() / target
}

/// Sorts by score descending, breaking ties by show id, and keeps the top results
pub fn rank_top<T: Recommendation>(mut results: Vec<T>) -> Vec<T> {
    results.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| a.show_id().cmp(b.show_id()))
    });
    results.truncate(MAX_RECOMMENDATIONS);
    results
}

/// True when `results` is ordered by descending score
#[cfg(test)]
pub(crate) fn is_ranked<T: Recommendation>(results: &[T]) -> bool {
    results
        .windows(2)
        .all(|w| w[0].score().total_cmp(&w[1].score()) != std::cmp::Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShowId;

    #[derive(Debug)]
    struct Scored(ShowId, f64);

    impl Recommendation for Scored {
        fn show_id(&self) -> &ShowId {
            &self.0
        }

        fn title(&self) -> &str {
            &self.0 .0
        }

        fn score(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_log_votes() {
        assert_eq!(log_votes(0), 0.0);
        assert!((log_votes(99) - 100f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_votes() {
        let reference = log_votes(999);
        assert!((normalize_votes(999, reference) - 1.0).abs() < 1e-12);
        assert!(normalize_votes(99, reference) < 1.0);
        assert_eq!(normalize_votes(500, 0.0), 0.0);
    }

    #[test]
    fn test_time_closeness() {
        assert_eq!(time_closeness(50.0, 50.0), 1.0);
        assert!((time_closeness(45.0, 50.0) - 0.9).abs() < 1e-12);
        assert!((time_closeness(600.0, 750.0) - 0.8).abs() < 1e-12);
        assert!(time_closeness(200.0, 50.0) < 0.0);
    }

    #[test]
    fn test_rank_top_orders_and_truncates() {
        let results: Vec<Scored> = (0..8)
            .map(|i| Scored(ShowId(format!("tt{}", i)), i as f64))
            .collect();

        let ranked = rank_top(results);
        let scores: Vec<f64> = ranked.iter().map(|r| r.1).collect();
        assert_eq!(scores, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
        assert!(is_ranked(&ranked));
    }

    #[test]
    fn test_rank_top_breaks_ties_by_show_id() {
        let results = vec![
            Scored(ShowId::from("tt3"), 1.0),
            Scored(ShowId::from("tt1"), 1.0),
            Scored(ShowId::from("tt2"), 2.0),
        ];

        let ranked = rank_top(results);
        let ids: Vec<&str> = ranked.iter().map(|r| r.0 .0.as_str()).collect();
        assert_eq!(ids, vec!["tt2", "tt1", "tt3"]);
    }
}
