use crate::domain::FeedDocument;
use crate::error::FetchError;
use async_trait::async_trait;

/// Port for the remote earthquake feed
#[async_trait]
pub trait FeedPort: Send + Sync {
    /// Fetch and decode the latest-event document.
    /// A non-success HTTP status is an error.
    async fn fetch_latest(&self) -> Result<FeedDocument, FetchError>;

    /// Check whether a derived asset (the shakemap image) can be retrieved
    async fn probe_asset(&self, url: &str) -> Result<bool, FetchError>;
}
