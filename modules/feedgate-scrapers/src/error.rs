use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScraperError>;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The request never produced a server response (DNS, connect, TLS, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Run failed with status: {0}")]
    RunFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Instagram bounced the profile request to its login page.
    #[error("Instagram redirected to the login page while scraping {0}")]
    LoginRedirect(String),

    /// The scraped source was not the kind of page that was asked for.
    #[error("Wrong source: expected a profile, got {0}")]
    WrongSource(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(err: reqwest::Error) -> Self {
        ScraperError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ScraperError {
    fn from(err: serde_json::Error) -> Self {
        ScraperError::Parse(err.to_string())
    }
}
