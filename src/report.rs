//! Presentation of analysis results.
//!
//! Bundles the computed statistics with the source URL and wall-clock
//! duration of the computation into a single structured result, and renders
//! it either as a human-readable summary or as JSON. All formatting
//! (durations, percentages, truncation) happens here; the analyzer only
//! returns raw values.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::analyze::GapStatistics;
use crate::token::LogDate;

/// The complete result of analyzing one raid log.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// The log URL that was analyzed.
    pub url: String,

    /// The calendar date the log's timestamps were composed against.
    pub log_date: String,

    /// True when the log carried no date and the epoch fallback was used.
    pub date_fallback: bool,

    /// The computed gap statistics.
    pub stats: GapStatistics,

    /// Wall-clock duration of extraction plus analysis, in milliseconds.
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    pub fn new(
        url: impl Into<String>,
        log_date: LogDate,
        stats: GapStatistics,
        elapsed: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            log_date: log_date.to_string(),
            date_fallback: log_date.fallback,
            stats,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Format a millisecond quantity as a human-friendly duration.
///
/// Negative averages (out-of-order input) are shown as raw milliseconds,
/// since a negative duration has no human-friendly spelling.
fn format_millis(ms: f64) -> String {
    if ms < 0.0 {
        return format!("{:.2}ms", ms);
    }
    if ms < 1000.0 {
        // Keep sub-second precision instead of rounding to whole units.
        return format!("{:.2}ms", ms);
    }
    humantime::format_duration(Duration::from_millis(ms.round() as u64)).to_string()
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;

        writeln!(
            f,
            "Analyzed {} joins from {}.",
            stats.join_count + 1,
            self.url
        )?;
        if self.date_fallback {
            writeln!(
                f,
                "Warning: the log carried no date; times were read against {}.",
                self.log_date
            )?;
        }
        writeln!(
            f,
            "Average time between joins: {} ({} ms raw).",
            format_millis(stats.average_gap_ms),
            stats.average_gap_display
        )?;

        if stats.zero_gaps.count > 0 {
            writeln!(
                f,
                "{} of {} joins happened at the same time as the previous one ({:.2}% of all).",
                stats.zero_gaps.count,
                stats.join_count,
                stats.zero_gaps.chance * 100.0
            )?;
            writeln!(f, "Simultaneous join positions: {}.", stats.zero_gaps.display_list)?;
        } else {
            writeln!(f, "No two joins happened at the same time.")?;
        }

        if let Some(ref p) = stats.percentiles {
            writeln!(f)?;
            writeln!(f, "Gap distribution (ms):")?;
            writeln!(f, "  Min: {}, Max: {}, Mean: {:.1}", p.min, p.max, p.mean)?;
            writeln!(f, "  P50: {}, P90: {}, P99: {}", p.p50, p.p90, p.p99)?;
        }

        write!(f, "\nAnalysis took {}ms.", self.elapsed_ms)
    }
}
