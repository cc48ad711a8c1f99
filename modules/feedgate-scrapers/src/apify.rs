// Facebook page posts via the Apify facebook-posts-scraper actor.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ScraperError};
use crate::source::FeedSource;
use crate::types::{
    ApiResponse, FacebookPost, FacebookScraperInput, RawFeedPost, RunData, StartUrl,
};

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/facebook-posts-scraper.
const FACEBOOK_POSTS_SCRAPER: &str = "KoJrdxJCTtpon81KY";

/// Posts requested from the actor per feed page.
pub const POSTS_PER_PAGE: u32 = 4;

pub struct ApifyClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl ApifyClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", BASE_URL, actor);
        let resp = self
            .authorize(self.client.post(&url))
            .json(input)
            .send()
            .await?;

        let api_resp: ApiResponse<RunData> = read_json(resp).await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", BASE_URL, run_id);
            let resp = self.authorize(self.client.get(&url)).send().await?;

            let api_resp: ApiResponse<RunData> = read_json(resp).await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ScraperError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", BASE_URL, dataset_id);
        let resp = self.authorize(self.client.get(&url)).send().await?;
        read_json(resp).await
    }

    /// Run an actor end-to-end: start, poll, fetch results.
    pub async fn run_actor<I, T>(&self, actor: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let run = self.start_run(actor, input).await?;
        info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }
}

/// Non-success statuses keep the upstream body; a failed body read has no response to report.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ScraperError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Expand a bare page name into the page URL the actor expects.
pub fn page_url(account: &str) -> String {
    if account.starts_with("http://") || account.starts_with("https://") {
        account.to_string()
    } else {
        format!("https://www.facebook.com/{}", account.trim_start_matches('/'))
    }
}

pub struct FacebookPageScraper {
    client: ApifyClient,
}

impl FacebookPageScraper {
    pub fn new(client: ApifyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for FacebookPageScraper {
    async fn get_posts(&self, account: &str, pages: u32) -> Result<Vec<RawFeedPost>> {
        let account = account.trim();
        if account.is_empty() {
            return Err(ScraperError::InvalidInput(
                "account must be a non-empty page name or URL".to_string(),
            ));
        }
        if pages == 0 {
            return Err(ScraperError::InvalidInput(
                "pages must be a positive integer".to_string(),
            ));
        }

        let limit = pages.saturating_mul(POSTS_PER_PAGE);
        info!(account, pages, limit, "Starting Facebook page scrape");

        let input = FacebookScraperInput {
            start_urls: vec![StartUrl {
                url: page_url(account),
            }],
            results_limit: limit,
        };

        let items: Vec<FacebookPost> = self.client.run_actor(FACEBOOK_POSTS_SCRAPER, &input).await?;
        info!(count = items.len(), "Fetched Facebook posts");

        items.into_iter().map(FacebookPost::into_raw).collect()
    }
}
