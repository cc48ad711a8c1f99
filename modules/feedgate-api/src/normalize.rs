//! JSON-safe response records.
//!
//! Raw adapter records carry `chrono` datetimes and NaN-marked metrics; the
//! records here carry ISO-8601 strings and `null` instead. Field order is the
//! JSON key order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use feedgate_scrapers::{RawFeedPost, RawProfilePost};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPost {
    pub post_id: Option<String>,
    pub text: String,
    pub post_text: String,
    pub shared_text: String,
    pub time: Option<String>,
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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub height: u64,
    pub width: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePost {
    pub id: String,
    pub shortcode: String,
    pub display_url: Option<String>,
    pub is_video: bool,
    pub caption: Option<String>,
    pub accessibility_caption: Option<String>,
    pub comments: Option<u64>,
    pub likes: Option<u64>,
    pub video_view_count: Option<u64>,
    pub comments_disabled: bool,
    pub dimensions: Option<Dimensions>,
    pub timestamp: i64,
    pub upload_date: String,
    pub location: Option<String>,
    pub tagged_users: Option<Vec<String>>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub fact_check_overall_rating: Option<String>,
    pub fact_check_information: Option<String>,
}

/// ISO-8601 (RFC 3339) rendering, e.g. `2024-01-31T09:00:00+00:00`.
pub fn iso8601(at: &DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// NaN becomes `None`; every other value passes through.
pub fn scrub_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn scrub_count(value: f64) -> Option<u64> {
    scrub_nan(value).map(|v| v as u64)
}

pub fn normalize_feed_post(raw: RawFeedPost) -> FeedPost {
    FeedPost {
        post_id: raw.post_id,
        text: raw.text,
        post_text: raw.post_text,
        shared_text: raw.shared_text,
        time: raw.time.as_ref().map(iso8601),
        image: raw.image,
        images: raw.images,
        video: raw.video,
        video_id: raw.video_id,
        video_thumbnail: raw.video_thumbnail,
        likes: raw.likes,
        comments: raw.comments,
        shares: raw.shares,
        post_url: raw.post_url,
        link: raw.link,
        user_id: raw.user_id,
        username: raw.username,
        is_live: raw.is_live,
    }
}

pub fn normalize_profile_post(raw: RawProfilePost) -> ProfilePost {
    let dimensions = match (scrub_count(raw.height), scrub_count(raw.width)) {
        (Some(height), Some(width)) => Some(Dimensions { height, width }),
        _ => None,
    };

    ProfilePost {
        id: raw.id,
        shortcode: raw.shortcode,
        display_url: raw.display_url,
        is_video: raw.is_video,
        caption: raw.caption,
        accessibility_caption: raw.accessibility_caption,
        comments: scrub_count(raw.comments),
        likes: scrub_count(raw.likes),
        video_view_count: scrub_count(raw.video_view_count),
        comments_disabled: raw.comments_disabled,
        dimensions,
        timestamp: raw.timestamp,
        upload_date: iso8601(&raw.upload_date),
        location: raw.location,
        tagged_users: raw.tagged_users,
        full_name: raw.full_name,
        username: raw.username,
        fact_check_overall_rating: raw.fact_check_overall_rating,
        fact_check_information: raw.fact_check_information,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_profile_post() -> RawProfilePost {
        RawProfilePost {
            id: "1".into(),
            shortcode: "abc".into(),
            display_url: Some("https://cdn/1.jpg".into()),
            is_video: false,
            caption: None,
            accessibility_caption: None,
            comments: 3.0,
            likes: f64::NAN,
            video_view_count: f64::NAN,
            comments_disabled: false,
            height: 1080.0,
            width: 1350.0,
            timestamp: 1_700_000_000,
            upload_date: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            location: None,
            tagged_users: None,
            full_name: None,
            username: Some("ferris".into()),
            fact_check_overall_rating: None,
            fact_check_information: None,
        }
    }

    #[test]
    fn iso8601_matches_rfc3339_with_offset() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(iso8601(&at), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn scrub_nan_only_touches_nan() {
        assert_eq!(scrub_nan(f64::NAN), None);
        assert_eq!(scrub_nan(0.0), Some(0.0));
        assert_eq!(scrub_nan(-1.5), Some(-1.5));
        assert_eq!(scrub_nan(f64::INFINITY), Some(f64::INFINITY));
    }

    #[test]
    fn profile_post_nan_metrics_serialize_as_null() {
        let post = normalize_profile_post(raw_profile_post());
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["likes"], serde_json::Value::Null);
        assert_eq!(json["video_view_count"], serde_json::Value::Null);
        assert_eq!(json["comments"], 3);
        assert_eq!(json["upload_date"], "2023-11-14T22:13:20+00:00");
        assert_eq!(json["timestamp"], 1_700_000_000);
        assert_eq!(json["dimensions"]["width"], 1350);
    }

    #[test]
    fn profile_post_partial_dimensions_are_dropped() {
        let mut raw = raw_profile_post();
        raw.width = f64::NAN;
        assert_eq!(normalize_profile_post(raw).dimensions, None);
    }

    #[test]
    fn profile_post_keys_keep_declared_order() {
        let json = serde_json::to_string(&normalize_profile_post(raw_profile_post())).unwrap();
        let id = json.find("\"id\"").unwrap();
        let shortcode = json.find("\"shortcode\"").unwrap();
        let upload_date = json.find("\"upload_date\"").unwrap();
        assert!(id < shortcode && shortcode < upload_date);
    }

    #[test]
    fn feed_post_time_becomes_iso_and_rest_passes_through() {
        let raw = RawFeedPost {
            post_id: Some("p1".into()),
            text: "hello".into(),
            post_text: "hello".into(),
            shared_text: String::new(),
            time: DateTime::from_timestamp(0, 0),
            image: None,
            images: vec!["https://img/1.jpg".into()],
            video: None,
            video_id: None,
            video_thumbnail: None,
            likes: 1,
            comments: 2,
            shares: 3,
            post_url: Some("https://facebook.com/p1".into()),
            link: None,
            user_id: Some("42".into()),
            username: Some("page".into()),
            is_live: false,
        };

        let post = normalize_feed_post(raw.clone());
        assert_eq!(post.time.as_deref(), Some("1970-01-01T00:00:00+00:00"));
        assert_eq!(post.text, raw.text);
        assert_eq!(post.images, raw.images);
        assert_eq!((post.likes, post.comments, post.shares), (1, 2, 3));
    }

    #[test]
    fn feed_post_without_time_stays_null() {
        let raw = RawFeedPost {
            post_id: None,
            text: String::new(),
            post_text: String::new(),
            shared_text: String::new(),
            time: None,
            image: None,
            images: Vec::new(),
            video: None,
            video_id: None,
            video_thumbnail: None,
            likes: 0,
            comments: 0,
            shares: 0,
            post_url: None,
            link: None,
            user_id: None,
            username: None,
            is_live: true,
        };
        let json = serde_json::to_value(normalize_feed_post(raw)).unwrap();
        assert_eq!(json["time"], serde_json::Value::Null);
    }
}
