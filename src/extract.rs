//! Timestamp extraction from raw raid-log text.
//!
//! Raid logs are unstructured text; the only structure this tool relies on
//! is the presence of join-time tokens and (usually) one date token. This
//! module locates those substrings in document order and normalizes them
//! into an absolute UTC instant sequence.
//!
//! Source order is trusted: the sequence is never sorted or deduplicated.
//! Duplicate tokens are legal and meaningful, since two accounts joining in
//! the same millisecond produce identical stamps.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::parser::{parse_log_date, parse_time_token};
use crate::token::LogDate;

/// Matches join-time tokens like `17:23:05.128-0700`.
static TIME_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\d:\d\d:\d\d\.\d\d\d[+-]\d\d\d\d").expect("Failed to compile time token regex")
});

/// Matches date tokens like `2022/01/15` or `2022-01-15`.
static LOG_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\d\d\d[/-]\d\d[/-]\d\d").expect("Failed to compile log date regex")
});

/// The outcome of scanning one log document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Absolute UTC instants, one per well-formed join-time token, in
    /// document order.
    pub instants: Vec<DateTime<Utc>>,

    /// The calendar date all instants were composed against.
    pub log_date: LogDate,

    /// Number of token-shaped substrings found in the text, including any
    /// that were skipped for invalid clock values.
    pub token_count: usize,

    /// Number of token-shaped substrings that did not survive validation.
    pub skipped_tokens: usize,
}

/// Scan `text` for join-time tokens and produce the UTC instant sequence.
///
/// Zero matches is a valid outcome and yields an empty sequence; the fatal
/// decision belongs to the analysis layer. The calendar date is taken from
/// the first date token in the text, falling back to `1970-01-01` when the
/// text has none (or only an impossible one), in which case the result is
/// flagged via [`LogDate::fallback`].
///
/// Each token's UTC offset is applied individually, so documents that mix
/// offsets (e.g. across a daylight-saving transition) normalize correctly.
pub fn extract_join_instants(text: &str) -> Extraction {
    let log_date = find_log_date(text);
    if log_date.fallback {
        warn!("No usable log date found in text; assuming {}", log_date);
    }

    let mut instants = Vec::new();
    let mut token_count = 0usize;
    let mut skipped_tokens = 0usize;

    for m in TIME_TOKEN_RE.find_iter(text) {
        token_count += 1;
        match parse_time_token(m.as_str()) {
            Ok(token) => instants.push(token.instant_on(log_date.date)),
            Err(e) => {
                skipped_tokens += 1;
                debug!("Skipping token '{}': {}", m.as_str(), e);
            }
        }
    }

    debug!(
        "Extracted {} instants from {} token matches (date: {})",
        instants.len(),
        token_count,
        log_date
    );

    Extraction {
        instants,
        log_date,
        token_count,
        skipped_tokens,
    }
}

/// Find the document's calendar date: the first date token in the text.
fn find_log_date(text: &str) -> LogDate {
    let Some(m) = LOG_DATE_RE.find(text) else {
        return LogDate::missing();
    };
    match parse_log_date(m.as_str()) {
        Ok(date) => LogDate::found(date),
        Err(e) => {
            debug!("Ignoring date token '{}': {}", m.as_str(), e);
            LogDate::missing()
        }
    }
}
