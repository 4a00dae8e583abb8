//! HTTP fetching of remote raid logs.
//!
//! This module handles the one network call in the pipeline: a GET of the
//! log body as plain text, preceded by validation of the URL against an
//! explicitly supplied domain allow-list. There is no retry logic; a failed
//! fetch is fatal and surfaced with the triggering URL attached.

use reqwest::{Client, StatusCode, header};
use thiserror::Error;
use tracing::debug;

/// Log hosts accepted by default. Beemo publishes raid logs on these.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["logs.beemo.gg", "archive.ayu.dev"];

/// User-Agent sent with every fetch.
pub const USER_AGENT: &str = concat!("beemo-log-analyzer/", env!("CARGO_PKG_VERSION"));

/// The URL's host is not in the allow-list; no computation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Domain of `{url}` is not supported; supported domains are: {allowed}")]
pub struct UnsupportedDomainError {
    pub url: String,
    pub allowed: String,
}

/// Errors that can occur while retrieving log text.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to `{url}` failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to `{url}` returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Response from `{url}` is not text (content-type: {content_type})")]
    NotText { url: String, content_type: String },

    #[error("Could not read response body from `{url}`: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Extract the host portion of a URL, without scheme, userinfo, or port.
fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

/// Validate a log URL against an allow-list of known log-hosting domains.
///
/// The allow-list is always passed in explicitly (from configuration), never
/// read from process-wide state. Matching is by exact host.
pub fn validate_url(url: &str, allowed_domains: &[String]) -> Result<(), UnsupportedDomainError> {
    let supported = host_of(url)
        .map(|host| allowed_domains.iter().any(|d| d == host))
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(UnsupportedDomainError {
            url: url.to_string(),
            allowed: allowed_domains.join(", "),
        })
    }
}

/// Fetch the raw text body of a log URL.
///
/// Fails on transport errors, non-success status, and responses whose
/// Content-Type is declared as something other than text. A missing
/// Content-Type header is accepted; log hosts do not always set one.
pub async fn fetch_log_text(client: &Client, url: &str) -> Result<String, FetchError> {
    debug!("Fetching log text from {}", url);

    let response = client
        .get(url)
        .header(header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    if let Some(content_type) = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        && !is_text_content_type(content_type)
    {
        return Err(FetchError::NotText {
            url: url.to_string(),
            content_type: content_type.to_string(),
        });
    }

    let text = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    debug!("Fetched {} bytes from {}", text.len(), url);
    Ok(text)
}

/// Accept `text/*` and the JSON types some archives serve logs as.
fn is_text_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    essence.starts_with("text/") || essence == "application/json"
}
