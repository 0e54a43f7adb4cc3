use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::client::{BoxError, Client, GetError};

/// Pause between two connection attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("cannot connect to {url} after {attempts} attempts: {source}")]
    ConnectionExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: BoxError,
    },
}

/// GETs the scrape target, retrying connection-level failures only.
///
/// HTTP error statuses are not failures here: the body is handed back as-is.
pub struct Fetcher<C> {
    client: C,
    target: String,
    retry_budget: u32,
    retry_delay: Duration,
}

impl<C: Client> Fetcher<C> {
    pub fn new<T: Into<String>>(client: C, target: T, retry_budget: u32) -> Self {
        Self {
            client,
            target: target.into(),
            retry_budget,
            retry_delay: RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Makes at most `retry_budget + 1` attempts.
    pub fn fetch(&self) -> Result<String, FetchError> {
        let max_attempts = self.retry_budget.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match self.client.get(&self.target) {
                Ok(resp) => {
                    if !resp.is_success() {
                        warn!(url = %self.target, status = resp.status, "scrape target answered with an error status");
                    }
                    debug!(url = %self.target, attempt, bytes = resp.body.len(), "fetched scrape target");
                    return Ok(resp.body);
                }
                Err(GetError::Other(source)) => {
                    return Err(FetchError::Transport {
                        url: self.target.clone(),
                        source,
                    })
                }
                Err(GetError::Connect(source)) => source,
            };

            let remaining = max_attempts - attempt;
            if remaining == 0 {
                return Err(FetchError::ConnectionExhausted {
                    url: self.target.clone(),
                    attempts: attempt,
                    source: err,
                });
            }

            warn!(
                url = %self.target,
                attempt,
                remaining,
                error = %err,
                "cannot connect to scrape target, retrying"
            );
            thread::sleep(self.retry_delay);
        }
    }
}
