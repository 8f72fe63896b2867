use std::sync::Arc;

use async_trait::async_trait;

/// Source of bill pages.
///
/// Implementations never fail past this boundary: any transport or decoding
/// problem is logged and reported as `None`, which the driver counts as a miss.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its body text.
    async fn fetch(&self, url: &str) -> Option<String>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Option<String> {
        (**self).fetch(url).await
    }
}
