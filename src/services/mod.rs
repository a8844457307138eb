pub mod daily_binge;
pub mod enrichment;
pub mod full_completion;
pub mod genre_filter;
pub mod providers;
pub mod scoring;

pub use daily_binge::select_daily_binge;
pub use enrichment::enrich_with_images;
pub use full_completion::select_full_completion;
pub use genre_filter::filter_by_genre;
