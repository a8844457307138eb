/// Image lookup provider abstraction
///
/// Recommendations are decorated with a representative image after ranking.
/// Providers only answer "find one image for this query"; the enrichment step
/// decides how failures and slow lookups are handled.
use crate::error::AppResult;

pub mod custom_search;

pub use custom_search::CustomSearchProvider;

/// Trait for image search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    /// Returns the URL of the best matching image, if any
    async fn find_image(&self, query: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
