// Instagram profile timeline via the public web profile endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{redirect, StatusCode};
use tracing::{info, warn};

use crate::error::{Result, ScraperError};
use crate::source::ProfileSource;
use crate::types::{ScrapedProfile, WebProfileResponse};

const PROFILE_ENDPOINT: &str = "https://i.instagram.com/api/v1/users/web_profile_info/";

/// App id the Instagram web client sends with every API call.
pub const DEFAULT_APP_ID: &str = "936619743392459";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct InstagramProfileScraper {
    client: reqwest::Client,
    app_id: String,
}

impl InstagramProfileScraper {
    pub fn new(app_id: &str) -> Result<Self> {
        // Redirects are inspected, not followed: a hop to /accounts/login is the
        // login wall.
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            app_id: app_id.to_string(),
        })
    }
}

#[async_trait]
impl ProfileSource for InstagramProfileScraper {
    async fn scrape(&self, account: &str) -> Result<ScrapedProfile> {
        let account = account.trim().trim_start_matches('@');
        if account.is_empty() {
            return Err(ScraperError::InvalidInput(
                "account must be a non-empty username".to_string(),
            ));
        }

        info!(account, "Scraping Instagram profile");

        let resp = self
            .client
            .get(PROFILE_ENDPOINT)
            .query(&[("username", account)])
            .header("x-ig-app-id", &self.app_id)
            .send()
            .await?;

        let status = resp.status();
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.text().await?;

        let profile = parse_profile_response(account, status, location.as_deref(), &body)?;
        info!(account, count = profile.posts.len(), "Fetched Instagram posts");
        Ok(profile)
    }
}

/// Classify a web profile response into a scraped profile or one of the
/// scraper's failure conditions.
pub fn parse_profile_response(
    account: &str,
    status: StatusCode,
    location: Option<&str>,
    body: &str,
) -> Result<ScrapedProfile> {
    if status.is_redirection() {
        let target = location.unwrap_or_default();
        if is_login_wall(target) {
            return Err(ScraperError::LoginRedirect(account.to_string()));
        }
        return Err(ScraperError::WrongSource(format!("a redirect to {target:?}")));
    }

    if !status.is_success() {
        if requires_login(body) {
            return Err(ScraperError::LoginRedirect(account.to_string()));
        }
        return Err(ScraperError::Api {
            status: status.as_u16(),
            message: body.to_string(),
        });
    }

    let parsed: WebProfileResponse = serde_json::from_str(body).map_err(|e| {
        warn!(account, error = %e, "Profile response is not profile JSON");
        ScraperError::WrongSource("a document that is not profile data".to_string())
    })?;

    let mut user = parsed
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| ScraperError::WrongSource(format!("no profile for {account:?}")))?;

    let nodes = user
        .edge_owner_to_timeline_media
        .take()
        .map(|media| media.edges)
        .unwrap_or_default();

    let posts = nodes
        .into_iter()
        .map(|edge| edge.node.into_raw(&user))
        .collect::<Result<Vec<_>>>()?;

    Ok(ScrapedProfile {
        username: user.username,
        full_name: user.full_name,
        posts,
    })
}

fn is_login_wall(target: &str) -> bool {
    target.contains("/accounts/login") || target.contains("/challenge")
}

fn requires_login(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("require_login").and_then(|r| r.as_bool()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_body() -> String {
        serde_json::json!({
            "data": {
                "user": {
                    "id": "7",
                    "username": "ferris",
                    "full_name": "Ferris Crab",
                    "edge_owner_to_timeline_media": {
                        "count": 2,
                        "edges": [
                            { "node": {
                                "id": "2", "shortcode": "B", "is_video": true,
                                "taken_at_timestamp": 1_700_000_100,
                                "edge_liked_by": { "count": 10 },
                                "edge_media_to_comment": { "count": 1 },
                                "video_view_count": 99
                            } },
                            { "node": {
                                "id": "1", "shortcode": "A",
                                "taken_at_timestamp": 1_700_000_000,
                                "location": { "name": "Tokyo" },
                                "edge_media_to_tagged_user": { "edges": [
                                    { "node": { "user": { "username": "bob" } } }
                                ] }
                            } }
                        ]
                    }
                }
            },
            "status": "ok"
        })
        .to_string()
    }

    #[test]
    fn parses_timeline_in_upstream_order() {
        let profile =
            parse_profile_response("ferris", StatusCode::OK, None, &profile_body()).unwrap();

        assert_eq!(profile.username, "ferris");
        let ids: Vec<&str> = profile.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(profile.posts[0].video_view_count, 99.0);
        assert!(profile.posts[1].likes.is_nan());
        assert_eq!(profile.posts[1].location.as_deref(), Some("Tokyo"));
        assert_eq!(
            profile.posts[1].tagged_users,
            Some(vec!["bob".to_string()])
        );
        assert_eq!(profile.posts[1].full_name.as_deref(), Some("Ferris Crab"));
    }

    #[test]
    fn recent_posts_takes_the_first_amt() {
        let profile =
            parse_profile_response("ferris", StatusCode::OK, None, &profile_body()).unwrap();
        assert_eq!(profile.recent_posts(1).len(), 1);
        assert_eq!(profile.recent_posts(1)[0].shortcode, "B");
        assert_eq!(profile.recent_posts(12).len(), 2);
    }

    #[test]
    fn redirect_to_login_is_login_redirect() {
        let err = parse_profile_response(
            "ferris",
            StatusCode::FOUND,
            Some("https://www.instagram.com/accounts/login/?next=/ferris/"),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, ScraperError::LoginRedirect(account) if account == "ferris"));
    }

    #[test]
    fn require_login_body_is_login_redirect() {
        let err = parse_profile_response(
            "ferris",
            StatusCode::UNAUTHORIZED,
            None,
            r#"{"message":"Please wait a few minutes","require_login":true,"status":"fail"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScraperError::LoginRedirect(_)));
    }

    #[test]
    fn other_redirect_is_wrong_source() {
        let err = parse_profile_response(
            "ferris",
            StatusCode::MOVED_PERMANENTLY,
            Some("https://www.instagram.com/p/abc/"),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, ScraperError::WrongSource(_)));
    }

    #[test]
    fn html_body_is_wrong_source() {
        let err = parse_profile_response("ferris", StatusCode::OK, None, "<!DOCTYPE html>")
            .unwrap_err();
        assert!(matches!(err, ScraperError::WrongSource(_)));
    }

    #[test]
    fn missing_user_is_wrong_source() {
        let err = parse_profile_response("ferris", StatusCode::OK, None, r#"{"data":{"user":null}}"#)
            .unwrap_err();
        assert!(matches!(err, ScraperError::WrongSource(_)));
    }

    #[test]
    fn upstream_error_keeps_status_and_body() {
        let err = parse_profile_response("ferris", StatusCode::NOT_FOUND, None, "not found")
            .unwrap_err();
        match err {
            ScraperError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
