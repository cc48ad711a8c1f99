use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use feedgate_api::{build_router, AppState, Config};
use feedgate_scrapers::{ApifyClient, FacebookPageScraper, InstagramProfileScraper};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("feedgate=info".parse()?))
        .init();

    let config = Config::from_env()?;

    if config.apify_token.is_none() {
        tracing::warn!("APIFY_TOKEN not set, Facebook scrapes will run unauthenticated");
    }

    let state = Arc::new(AppState {
        feed: Arc::new(FacebookPageScraper::new(ApifyClient::new(
            config.apify_token.clone(),
        ))),
        profiles: Arc::new(InstagramProfileScraper::new(&config.instagram_app_id)?),
    });

    let app = build_router(state);

    let addr = config.bind_addr();
    info!("feedgate starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
