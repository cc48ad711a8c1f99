use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::error::{http_error_policy, profile_error_policy, Result};
use crate::normalize::{normalize_feed_post, normalize_profile_post, FeedPost, ProfilePost};
use crate::AppState;

pub const GREETING: &str = "Hello World!";

// --- Query structs ---

#[derive(Debug, Deserialize)]
pub struct FacebookPostsQuery {
    account: String,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
pub struct InstagramPostsQuery {
    account: String,
    #[serde(default = "default_amt")]
    amt: u32,
}

fn default_amt() -> u32 {
    12
}

// --- Handlers ---

pub async fn root() -> Json<&'static str> {
    Json(GREETING)
}

pub async fn facebook_posts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<FacebookPostsQuery>, QueryRejection>,
) -> Result<Json<Vec<FeedPost>>> {
    let Query(params) = query?;
    info!(account = %params.account, pages = params.pages, "Fetching Facebook posts");

    let raw = state
        .feed
        .get_posts(&params.account, params.pages)
        .await
        .map_err(http_error_policy)?;

    Ok(Json(raw.into_iter().map(normalize_feed_post).collect()))
}

pub async fn instagram_posts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<InstagramPostsQuery>, QueryRejection>,
) -> Result<Json<Vec<ProfilePost>>> {
    let Query(params) = query?;
    info!(account = %params.account, amt = params.amt, "Fetching Instagram posts");

    let profile = state
        .profiles
        .scrape(&params.account)
        .await
        .map_err(profile_error_policy)?;

    let posts = profile
        .recent_posts(params.amt as usize)
        .into_iter()
        .map(normalize_profile_post)
        .collect();

    Ok(Json(posts))
}
