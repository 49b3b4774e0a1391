pub use error::FetchError;
pub use http::{DEFAULT_FETCH_TIMEOUT, HttpFeedSource};

mod error;
mod http;

use async_trait::async_trait;
use herald_types_events::EventRecord;

/// Anything that can produce the current list of records behind a feed URL
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<EventRecord>, FetchError>;
}

#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for Box<T> {
    async fn fetch(&self, url: &str) -> Result<Vec<EventRecord>, FetchError> {
        (**self).fetch(url).await
    }
}
