mod client;
mod fetcher;

pub use client::{BoxError, Client, GetError, HttpClient, Response};
pub use fetcher::{FetchError, Fetcher, RETRY_DELAY};

/// Fetches `target` with a default HTTP client.
pub fn fetch(target: &str, retry_budget: u32) -> Result<String, FetchError> {
    let client = HttpClient::new(None).map_err(|e| FetchError::Transport {
        url: target.to_owned(),
        source: Box::new(e),
    })?;
    Fetcher::new(client, target, retry_budget).fetch()
}
