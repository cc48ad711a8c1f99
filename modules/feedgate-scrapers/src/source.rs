use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RawFeedPost, ScrapedProfile};

/// Supplies a page's public posts, one feed page at a time.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch `pages` pages of `account`'s posts, in the order the upstream
    /// emits them. Fails with [`ScraperError::InvalidInput`](crate::ScraperError::InvalidInput)
    /// for an empty account or zero pages.
    async fn get_posts(&self, account: &str, pages: u32) -> Result<Vec<RawFeedPost>>;
}

/// Scrapes a profile together with its recent timeline.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn scrape(&self, account: &str) -> Result<ScrapedProfile>;
}
