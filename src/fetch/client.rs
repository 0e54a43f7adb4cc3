use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Outcome of a single failed GET, split by whether another attempt makes sense.
#[derive(Debug, Error)]
pub enum GetError {
    /// The target could not be reached or dropped the connection. Retryable.
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),
    /// Anything else. Terminal.
    #[error("{0}")]
    Other(#[source] BoxError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Client {
    fn get(&self, url: &str) -> Result<Response, GetError>;
}

/// Blocking HTTP client backed by `reqwest`.
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Without a `timeout` the transport default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }
}

impl Client for HttpClient {
    fn get(&self, url: &str) -> Result<Response, GetError> {
        let resp = self.inner.get(url).send().map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(classify)?;
        let body = String::from_utf8(body.to_vec()).map_err(|e| GetError::Other(Box::new(e)))?;
        Ok(Response { status, body })
    }
}

fn classify(err: reqwest::Error) -> GetError {
    if err.is_connect() || is_connection_io_error(&err) {
        GetError::Connect(Box::new(err))
    } else {
        GetError::Other(Box::new(err))
    }
}

// Resets and aborts surface as plain request errors; dig out the io::Error.
fn is_connection_io_error(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::NotConnected
                    | io::ErrorKind::BrokenPipe
            );
        }
        source = cause.source();
    }
    false
}
