//! Beemo Log Analyzer - A Rust library and CLI for analyzing join-time gaps
//! in Beemo raid logs.
//!
//! This crate provides:
//! - A timestamp extractor that scans raw log text for join-time tokens
//! - A gap analyzer computing count, mean, and simultaneous-join statistics
//! - An async HTTP fetcher with domain allow-list validation
//!
//! # Example
//!
//! ```rust
//! use beemo_log_analyzer::{analyze, extract_join_instants};
//!
//! let text = "2024/01/01\n10:00:00.000+0000\n10:00:00.500+0000\n10:00:01.000+0000\n";
//! let extraction = extract_join_instants(text);
//! let stats = analyze(&extraction.instants).expect("Failed to analyze log");
//!
//! assert_eq!(stats.join_count, 2);
//! assert_eq!(stats.average_gap_ms, 500.0);
//! ```

pub mod analyze;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod parser;
pub mod report;
pub mod token;

pub use analyze::{AnalyzeError, GapStatistics, ZeroGaps, analyze, analyze_with_progress};
pub use config::Config;
pub use extract::{Extraction, extract_join_instants};
pub use fetch::{
    DEFAULT_ALLOWED_DOMAINS, FetchError, UnsupportedDomainError, fetch_log_text, validate_url,
};
pub use parser::{ParseError, parse_log_date, parse_time_token};
pub use report::AnalysisReport;
pub use token::{LogDate, TimeToken};
