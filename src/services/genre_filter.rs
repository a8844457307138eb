use crate::models::Episode;

/// Narrows episodes to those whose genre list contains `genre`
///
/// Matching is a case-insensitive substring test against the whole genre
/// string, so "dra" matches "Crime,Drama". `None` or an empty query returns
/// every episode.
pub fn filter_by_genre<'a>(episodes: &'a [Episode], genre: Option<&str>) -> Vec<&'a Episode> {
    match genre {
        Some(query) if !query.is_empty() => {
            let needle = query.to_lowercase();
            episodes
                .iter()
                .filter(|e| e.genres.to_lowercase().contains(&needle))
                .collect()
        }
        _ => episodes.iter().collect(),
    }
}
