//! Data structures representing timestamps extracted from raid logs.
//!
//! This module defines the core types used throughout the application
//! to represent join-event timestamps found in Beemo log text.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date used when a log contains no date token at all.
///
/// An arbitrary but deterministic epoch marker. Results computed against it
/// are still internally consistent (gaps only depend on the clock fields),
/// but callers should treat its use as a degraded-input signal.
pub const FALLBACK_LOG_DATE: NaiveDate = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

/// A parsed join-time token from a raid log.
///
/// Raw tokens look like:
/// ```text
/// 17:23:05.128-0700
/// ```
///
/// The clock fields are wall-clock literals; the trailing 4-digit suffix is
/// the UTC offset the log was written in. The offset is kept as signed
/// minutes so it can be applied as an explicit shift when composing an
/// absolute instant, rather than relying on a datetime library's own offset
/// parsing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToken {
    /// The wall-clock time of day, including milliseconds.
    pub time: NaiveTime,

    /// UTC offset in signed minutes, parsed from the `±HHMM` suffix.
    /// `-0700` becomes `-420`.
    pub offset_minutes: i32,
}

impl TimeToken {
    /// Compose this token with a calendar date into an absolute UTC instant.
    ///
    /// The wall-clock value is shifted by the token's own offset, so a
    /// `-0700` token has seven hours added to reach UTC. The shift is applied
    /// uniformly for any offset value, and may roll the date forward or
    /// backward across midnight.
    ///
    /// # Example
    ///
    /// ```
    /// use beemo_log_analyzer::parser::parse_time_token;
    /// use chrono::NaiveDate;
    ///
    /// let token = parse_time_token("17:00:00.000-0700").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let instant = token.instant_on(date);
    /// assert_eq!(instant.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    /// ```
    pub fn instant_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = NaiveDateTime::new(date, self.time);
        Utc.from_utc_datetime(&naive) - Duration::minutes(self.offset_minutes as i64)
    }
}

impl fmt::Display for TimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let abs = self.offset_minutes.unsigned_abs();
        write!(
            f,
            "{}{}{:02}{:02}",
            self.time.format("%H:%M:%S%.3f"),
            sign,
            abs / 60,
            abs % 60
        )
    }
}

/// The calendar date resolved for one log document.
///
/// All time tokens in a document are assumed to share this date. Exactly one
/// date is used per document: the first match in the text, or
/// [`FALLBACK_LOG_DATE`] when the text contains none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDate {
    /// The resolved date.
    pub date: NaiveDate,

    /// True when no date token was found and the fallback was substituted.
    pub fallback: bool,
}

impl LogDate {
    /// A log date resolved from the document text.
    pub fn found(date: NaiveDate) -> Self {
        Self {
            date,
            fallback: false,
        }
    }

    /// The fallback date, used when the document carries no date token.
    pub fn missing() -> Self {
        Self {
            date: FALLBACK_LOG_DATE,
            fallback: true,
        }
    }
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}
