//! Gap statistics over an ordered join-instant sequence.
//!
//! This module computes the inter-event time differences for a sequence of
//! join instants and derives descriptive statistics: gap count, arithmetic
//! mean, the zero-gap subset (simultaneous joins) with positions, and an HDR
//! histogram distribution over the non-negative gaps.
//!
//! The computation is a single synchronous pass. Input order is trusted as
//! chronological; a negative gap is reported as-is since it is a meaningful
//! signal of out-of-order or misparsed input, not something to correct.

use chrono::{DateTime, Utc};
use hdrhistogram::Histogram;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Maximum number of zero-gap indices shown in the display list before
/// truncating with an "and N more" note.
pub const ZERO_GAP_DISPLAY_LIMIT: usize = 10;

/// Histograms track gaps up to one day; anything longer is clamped.
const MAX_HISTOGRAM_GAP_MS: u64 = 24 * 60 * 60 * 1000;

/// Errors that can occur during gap analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// The extractor yielded no timestamps at all.
    #[error("No join timestamps found in log text")]
    NoTimestamps,

    /// At least two instants are required to form one gap.
    #[error("Found {found} join timestamp(s); at least two are required to compute a gap")]
    InsufficientData { found: usize },
}

/// The zero-gap subset of the result: joins recorded as simultaneous.
#[derive(Debug, Clone, Serialize)]
pub struct ZeroGaps {
    /// Number of zero gaps.
    pub count: usize,

    /// 1-based positions into the instant sequence; index `i` means the gap
    /// between instants `i-1` and `i` was zero.
    pub indices: Vec<usize>,

    /// `count / join_count`, a ratio in `[0, 1]`.
    pub chance: f64,

    /// Human-readable index list, truncated after
    /// [`ZERO_GAP_DISPLAY_LIMIT`] entries.
    pub display_list: String,
}

/// Distribution of the non-negative gaps.
#[derive(Debug, Clone, Serialize)]
pub struct GapPercentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
}

/// Descriptive statistics over one join-instant sequence.
#[derive(Debug, Clone, Serialize)]
pub struct GapStatistics {
    /// Number of gaps, always one less than the instant count.
    pub join_count: usize,

    /// Plain arithmetic mean of the gaps in milliseconds, sign preserved.
    pub average_gap_ms: f64,

    /// The mean rounded to two decimals for display.
    pub average_gap_display: String,

    /// The simultaneous-join subset.
    pub zero_gaps: ZeroGaps,

    /// Gap distribution percentiles, absent when no gap was non-negative.
    pub percentiles: Option<GapPercentiles>,
}

/// Compute gap statistics for an ordered instant sequence.
///
/// Fails with [`AnalyzeError::NoTimestamps`] for an empty sequence and
/// [`AnalyzeError::InsufficientData`] for a single instant; an average over
/// zero gaps is undefined and must never silently divide by zero.
pub fn analyze(instants: &[DateTime<Utc>]) -> Result<GapStatistics, AnalyzeError> {
    analyze_with_progress(instants, |_| {})
}

/// Like [`analyze`], invoking `progress` once per processed gap.
///
/// The callback receives the number of gaps processed so far and exists only
/// to drive cosmetic display counters; it has no effect on the result.
pub fn analyze_with_progress<F>(
    instants: &[DateTime<Utc>],
    mut progress: F,
) -> Result<GapStatistics, AnalyzeError>
where
    F: FnMut(usize),
{
    match instants.len() {
        0 => return Err(AnalyzeError::NoTimestamps),
        1 => return Err(AnalyzeError::InsufficientData { found: 1 }),
        _ => {}
    }

    let mut gap_sum: i64 = 0;
    let mut zero_indices = Vec::new();
    let mut histogram = Histogram::<u64>::new_with_bounds(1, MAX_HISTOGRAM_GAP_MS, 3).ok();

    for (i, pair) in instants.windows(2).enumerate() {
        let gap = (pair[1] - pair[0]).num_milliseconds();
        debug!("Gap {} is {}ms", i + 1, gap);

        gap_sum += gap;
        if gap == 0 {
            zero_indices.push(i + 1);
        }
        if gap >= 0
            && let Some(hist) = histogram.as_mut()
        {
            let _ = hist.record((gap as u64).clamp(1, MAX_HISTOGRAM_GAP_MS));
        }

        progress(i + 1);
    }

    let join_count = instants.len() - 1;
    let average_gap_ms = gap_sum as f64 / join_count as f64;
    let chance = zero_indices.len() as f64 / join_count as f64;

    let percentiles = histogram.filter(|h| !h.is_empty()).map(|h| GapPercentiles {
        p50: h.value_at_quantile(0.50),
        p90: h.value_at_quantile(0.90),
        p99: h.value_at_quantile(0.99),
        min: h.min(),
        max: h.max(),
        mean: h.mean(),
    });

    Ok(GapStatistics {
        join_count,
        average_gap_ms,
        average_gap_display: format!("{:.2}", average_gap_ms),
        zero_gaps: ZeroGaps {
            count: zero_indices.len(),
            chance,
            display_list: build_display_list(&zero_indices),
            indices: zero_indices,
        },
        percentiles,
    })
}

/// Join zero-gap indices for display, truncating after the first
/// [`ZERO_GAP_DISPLAY_LIMIT`] entries.
fn build_display_list(indices: &[usize]) -> String {
    let shown: Vec<String> = indices
        .iter()
        .take(ZERO_GAP_DISPLAY_LIMIT)
        .map(|i| i.to_string())
        .collect();

    if indices.len() > ZERO_GAP_DISPLAY_LIMIT {
        format!(
            "{} and {} more",
            shown.join(", "),
            indices.len() - ZERO_GAP_DISPLAY_LIMIT
        )
    } else {
        shown.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    /// Build an instant sequence from a start point and a list of gaps.
    fn instants_from_gaps(gaps: &[i64]) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut instants = vec![start];
        let mut cursor = start;
        for &gap in gaps {
            cursor += chrono::Duration::milliseconds(gap);
            instants.push(cursor);
        }
        instants
    }

    #[test]
    fn test_analyze_empty_is_no_timestamps() {
        assert_eq!(analyze(&[]).unwrap_err(), AnalyzeError::NoTimestamps);
    }

    #[test]
    fn test_analyze_single_instant_is_insufficient() {
        let instants = instants_from_gaps(&[]);
        assert_eq!(
            analyze(&instants).unwrap_err(),
            AnalyzeError::InsufficientData { found: 1 }
        );
    }

    #[test]
    fn test_analyze_uniform_gaps() {
        let instants = instants_from_gaps(&[500, 500]);
        let stats = analyze(&instants).unwrap();

        assert_eq!(stats.join_count, 2);
        assert_eq!(stats.average_gap_ms, 500.0);
        assert_eq!(stats.average_gap_display, "500.00");
        assert_eq!(stats.zero_gaps.count, 0);
        assert_eq!(stats.zero_gaps.chance, 0.0);
        assert_eq!(stats.zero_gaps.display_list, "");
    }

    #[test]
    fn test_analyze_zero_gap_positions_are_one_based() {
        let instants = instants_from_gaps(&[0, 100, 0]);
        let stats = analyze(&instants).unwrap();

        assert_eq!(stats.join_count, 3);
        assert_eq!(stats.zero_gaps.count, 2);
        assert_eq!(stats.zero_gaps.indices, vec![1, 3]);
        assert_eq!(stats.zero_gaps.display_list, "1, 3");
    }

    #[test]
    fn test_analyze_all_zero_gaps() {
        let instants = instants_from_gaps(&[0, 0, 0]);
        let stats = analyze(&instants).unwrap();

        assert_eq!(stats.average_gap_ms, 0.0);
        assert_eq!(stats.zero_gaps.chance, 1.0);
        assert_eq!(stats.zero_gaps.indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_analyze_negative_gaps_reported_as_is() {
        let instants = instants_from_gaps(&[-1000, 500]);
        let stats = analyze(&instants).unwrap();

        assert_eq!(stats.join_count, 2);
        assert_eq!(stats.average_gap_ms, -250.0);
        assert_eq!(stats.zero_gaps.count, 0);
        // Negative gaps are excluded from the distribution only.
        let percentiles = stats.percentiles.unwrap();
        assert_eq!(percentiles.max, 500);
    }

    #[test]
    fn test_analyze_percentiles_absent_when_all_negative() {
        let instants = instants_from_gaps(&[-100, -200]);
        let stats = analyze(&instants).unwrap();
        assert!(stats.percentiles.is_none());
    }

    #[test]
    fn test_progress_callback_fires_once_per_gap() {
        let instants = instants_from_gaps(&[10, 20, 30]);
        let mut seen = Vec::new();
        let stats = analyze_with_progress(&instants, |n| seen.push(n)).unwrap();

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(stats.join_count, 3);
    }

    #[test]
    fn test_progress_callback_does_not_change_result() {
        let instants = instants_from_gaps(&[10, 0, 30]);
        let silent = analyze(&instants).unwrap();
        let noisy = analyze_with_progress(&instants, |_| {}).unwrap();

        assert_eq!(silent.average_gap_ms, noisy.average_gap_ms);
        assert_eq!(silent.zero_gaps.indices, noisy.zero_gaps.indices);
    }

    #[test]
    fn test_display_list_under_limit_shows_all() {
        let indices: Vec<usize> = (1..=10).collect();
        assert_eq!(
            build_display_list(&indices),
            "1, 2, 3, 4, 5, 6, 7, 8, 9, 10"
        );
    }

    #[test]
    fn test_display_list_truncates_after_ten() {
        let indices: Vec<usize> = (1..=15).collect();
        assert_eq!(
            build_display_list(&indices),
            "1, 2, 3, 4, 5, 6, 7, 8, 9, 10 and 5 more"
        );
    }

    #[test]
    fn test_display_list_empty() {
        assert_eq!(build_display_list(&[]), "");
    }

    proptest! {
        #[test]
        fn prop_join_count_is_one_less_than_instants(
            gaps in prop::collection::vec(0i64..100_000, 1..200)
        ) {
            let instants = instants_from_gaps(&gaps);
            let stats = analyze(&instants).unwrap();
            prop_assert_eq!(stats.join_count, instants.len() - 1);
        }

        #[test]
        fn prop_average_times_count_equals_sum(
            gaps in prop::collection::vec(-10_000i64..100_000, 1..200)
        ) {
            let instants = instants_from_gaps(&gaps);
            let stats = analyze(&instants).unwrap();
            let sum: i64 = gaps.iter().sum();
            let round_trip = stats.average_gap_ms * stats.join_count as f64;
            prop_assert!((round_trip - sum as f64).abs() < 1e-6);
        }

        #[test]
        fn prop_identical_gaps_average_exactly(
            gap in 0i64..1_000_000,
            count in 1usize..50
        ) {
            let gaps = vec![gap; count];
            let instants = instants_from_gaps(&gaps);
            let stats = analyze(&instants).unwrap();
            prop_assert_eq!(stats.average_gap_ms, gap as f64);
        }

        #[test]
        fn prop_chance_is_a_ratio(
            gaps in prop::collection::vec(0i64..3, 1..200)
        ) {
            let instants = instants_from_gaps(&gaps);
            let stats = analyze(&instants).unwrap();
            prop_assert!(stats.zero_gaps.chance >= 0.0);
            prop_assert!(stats.zero_gaps.chance <= 1.0);
            prop_assert_eq!(stats.zero_gaps.count, stats.zero_gaps.indices.len());
        }

        #[test]
        fn prop_zero_indices_point_at_zero_gaps(
            gaps in prop::collection::vec(0i64..3, 1..200)
        ) {
            let instants = instants_from_gaps(&gaps);
            let stats = analyze(&instants).unwrap();
            for &i in &stats.zero_gaps.indices {
                prop_assert_eq!(gaps[i - 1], 0);
            }
        }
    }
}
