//! Resource client contract shared by the sports API and the analytics backend.
//!
//! One GET per call, status validated, JSON decoded into the caller's type.
//! No retries, no caching, no de-duplication of identical in-flight requests.

use std::time::Duration;

use anyhow::Context;
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use thiserror::Error;

const USER_AGENT: &str = concat!("fpl_terminal/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http {status} {reason}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid json from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Anything that can answer a GET with a body. The HTTP implementation is the
/// only one in production; tests swap in canned responses.
pub trait JsonSource: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: &'static Client,
}

impl HttpSource {
    /// Every source shares one blocking client, so the first caller's timeout
    /// wins. `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let client = CLIENT.get_or_try_init(|| {
            Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .context("failed to build http client")
        })?;
        Ok(Self { client })
    }
}

impl JsonSource for HttpSource {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            // An unreadable error body must not hide the status.
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(resp.text()?)
    }
}

pub fn fetch_json<T: DeserializeOwned>(
    source: &dyn JsonSource,
    url: &str,
    debug: bool,
) -> Result<T, FetchError> {
    if debug {
        tracing::debug!(url, "GET");
    }
    let body = match source.get_text(url) {
        Ok(body) => body,
        Err(err) => {
            if debug {
                tracing::debug!(url, error = %err, "request failed");
            }
            return Err(err);
        }
    };
    if debug {
        tracing::debug!(url, bytes = body.len(), "OK");
    }
    serde_json::from_str(body.trim()).map_err(|err| FetchError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}
