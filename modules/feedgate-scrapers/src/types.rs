use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScraperError};

// --- Adapter boundary records ---

/// A Facebook page post as produced by a [`FeedSource`](crate::FeedSource).
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeedPost {
    pub post_id: Option<String>,
    pub text: String,
    pub post_text: String,
    pub shared_text: String,
    pub time: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub video_id: Option<String>,
    pub video_thumbnail: Option<String>,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub post_url: Option<String>,
    pub link: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub is_live: bool,
}

/// An Instagram timeline post as produced by a [`ProfileSource`](crate::ProfileSource).
///
/// Metrics are `f64` and hold NaN when the upstream did not report them.
#[derive(Debug, Clone)]
pub struct RawProfilePost {
    pub id: String,
    pub shortcode: String,
    pub display_url: Option<String>,
    pub is_video: bool,
    pub caption: Option<String>,
    pub accessibility_caption: Option<String>,
    pub comments: f64,
    pub likes: f64,
    pub video_view_count: f64,
    pub comments_disabled: bool,
    pub height: f64,
    pub width: f64,
    pub timestamp: i64,
    pub upload_date: DateTime<Utc>,
    pub location: Option<String>,
    pub tagged_users: Option<Vec<String>>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub fact_check_overall_rating: Option<String>,
    pub fact_check_information: Option<String>,
}

/// A scraped Instagram profile and its timeline, newest first.
#[derive(Debug, Clone)]
pub struct ScrapedProfile {
    pub username: String,
    pub full_name: Option<String>,
    pub posts: Vec<RawProfilePost>,
}

impl ScrapedProfile {
    /// The `amt` most recent posts, in upstream order.
    pub fn recent_posts(&self, amt: usize) -> Vec<RawProfilePost> {
        self.posts.iter().take(amt).cloned().collect()
    }
}

// --- Apify types ---

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Input for the apify/facebook-posts-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A start URL entry for Facebook scraper input.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// A single Facebook post from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookPost {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub time: Option<String>,
    pub timestamp: Option<i64>,
    pub link: Option<String>,
    #[serde(rename = "pageName")]
    pub page_name: Option<String>,
    pub user: Option<FacebookUser>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
    #[serde(default)]
    pub media: Vec<FacebookMedia>,
    #[serde(rename = "sharedPost")]
    pub shared_post: Option<FacebookSharedPost>,
    #[serde(rename = "isLive", default)]
    pub is_live: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacebookUser {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A photo or video attached to a Facebook post.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookMedia {
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

impl FacebookMedia {
    fn is_video(&self) -> bool {
        self.typename.as_deref() == Some("Video")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacebookSharedPost {
    pub text: Option<String>,
}

impl FacebookPost {
    /// Validate an Apify dataset item into the adapter's raw record.
    pub fn into_raw(self) -> Result<RawFeedPost> {
        let time = match (self.timestamp, self.time.as_deref()) {
            (Some(ts), _) => Some(DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                ScraperError::Parse(format!("timestamp out of range: {ts}"))
            })?),
            (None, Some(raw)) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| ScraperError::Parse(format!("invalid post time {raw:?}: {e}")))?
                    .with_timezone(&Utc),
            ),
            (None, None) => None,
        };

        let images: Vec<String> = self
            .media
            .iter()
            .filter(|m| !m.is_video())
            .filter_map(|m| m.thumbnail.clone().or_else(|| m.url.clone()))
            .collect();
        let video = self.media.iter().find(|m| m.is_video());

        let text = self.text.unwrap_or_default();
        let shared_text = self
            .shared_post
            .and_then(|s| s.text)
            .unwrap_or_default();
        let (user_id, user_name) = match self.user {
            Some(u) => (u.id, u.name),
            None => (None, None),
        };

        Ok(RawFeedPost {
            post_id: self.post_id,
            post_text: text.clone(),
            text,
            shared_text,
            time,
            image: images.first().cloned(),
            images,
            video: video.and_then(|v| v.url.clone()),
            video_id: video.and_then(|v| v.id.clone()),
            video_thumbnail: video.and_then(|v| v.thumbnail.clone()),
            likes: count(self.likes),
            comments: count(self.comments),
            shares: count(self.shares),
            post_url: self.url,
            link: self.link,
            user_id,
            username: user_name.or(self.page_name),
            is_live: self.is_live,
        })
    }
}

fn count(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

// --- Instagram web profile types ---

#[derive(Debug, Clone, Deserialize)]
pub struct WebProfileResponse {
    pub data: Option<WebProfileData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebProfileData {
    pub user: Option<InstagramUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstagramUser {
    pub id: Option<String>,
    pub username: String,
    pub full_name: Option<String>,
    pub edge_owner_to_timeline_media: Option<Edges<TimelineNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edges<T> {
    pub count: Option<f64>,
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeCount {
    pub count: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaggedUserNode {
    pub user: TaggedUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaggedUser {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimensions {
    pub height: Option<f64>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub name: Option<String>,
}

/// A post node from `edge_owner_to_timeline_media`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineNode {
    pub id: String,
    pub shortcode: String,
    pub display_url: Option<String>,
    #[serde(default)]
    pub is_video: bool,
    pub accessibility_caption: Option<String>,
    pub edge_media_to_caption: Option<Edges<CaptionNode>>,
    pub edge_media_to_comment: Option<EdgeCount>,
    pub edge_liked_by: Option<EdgeCount>,
    pub edge_media_preview_like: Option<EdgeCount>,
    #[serde(default)]
    pub comments_disabled: bool,
    pub taken_at_timestamp: i64,
    pub dimensions: Option<Dimensions>,
    pub location: Option<Location>,
    pub edge_media_to_tagged_user: Option<Edges<TaggedUserNode>>,
    pub video_view_count: Option<f64>,
    pub fact_check_overall_rating: Option<String>,
    pub fact_check_information: Option<String>,
}

impl TimelineNode {
    /// Validate a timeline node into the adapter's raw record. Metrics the
    /// upstream omitted become NaN.
    pub fn into_raw(self, owner: &InstagramUser) -> Result<RawProfilePost> {
        let upload_date = DateTime::from_timestamp(self.taken_at_timestamp, 0).ok_or_else(|| {
            ScraperError::Parse(format!(
                "taken_at_timestamp out of range: {}",
                self.taken_at_timestamp
            ))
        })?;

        let caption = self
            .edge_media_to_caption
            .and_then(|c| c.edges.into_iter().next())
            .map(|e| e.node.text);
        let likes = self
            .edge_liked_by
            .or(self.edge_media_preview_like)
            .and_then(|e| e.count);
        let tagged_users = self.edge_media_to_tagged_user.and_then(|t| {
            let users: Vec<String> = t.edges.into_iter().map(|e| e.node.user.username).collect();
            (!users.is_empty()).then_some(users)
        });
        let (height, width) = match self.dimensions {
            Some(d) => (d.height, d.width),
            None => (None, None),
        };

        Ok(RawProfilePost {
            id: self.id,
            shortcode: self.shortcode,
            display_url: self.display_url,
            is_video: self.is_video,
            caption,
            accessibility_caption: self.accessibility_caption,
            comments: or_nan(self.edge_media_to_comment.and_then(|e| e.count)),
            likes: or_nan(likes),
            video_view_count: or_nan(self.video_view_count),
            comments_disabled: self.comments_disabled,
            height: or_nan(height),
            width: or_nan(width),
            timestamp: self.taken_at_timestamp,
            upload_date,
            location: self.location.and_then(|l| l.name),
            tagged_users,
            full_name: owner.full_name.clone(),
            username: Some(owner.username.clone()),
            fact_check_overall_rating: self.fact_check_overall_rating,
            fact_check_information: self.fact_check_information,
        })
    }
}

fn or_nan(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}
