pub mod apify;
pub mod error;
pub mod instagram;
pub mod source;
pub mod types;

pub use apify::{ApifyClient, FacebookPageScraper};
pub use error::{Result, ScraperError};
pub use instagram::InstagramProfileScraper;
pub use source::{FeedSource, ProfileSource};
pub use types::{RawFeedPost, RawProfilePost, ScrapedProfile};
