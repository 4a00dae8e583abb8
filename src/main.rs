//! Beemo Log Analyzer CLI - Fetch a raid log and report join-time gap statistics.

use anyhow::{Context, Result};
use beemo_log_analyzer::{
    analyze::analyze_with_progress,
    config::Config,
    extract::extract_join_instants,
    fetch::{fetch_log_text, validate_url},
    report::AnalysisReport,
};
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// How many gaps between progress counter repaints.
const PROGRESS_EVERY: usize = 1000;

/// Beemo Log Analyzer - Analyze join-time gaps in a Beemo raid log
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the raid log to analyze
    url: String,

    /// Print the result as JSON instead of the human-readable summary
    #[arg(long)]
    json: bool,

    /// Additional allowed log-hosting domain (repeatable)
    #[arg(long = "allow-domain", value_name = "DOMAIN")]
    allow_domains: Vec<String>,

    /// Fetch timeout in seconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable the progress counter
    #[arg(long)]
    no_progress: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    config.allowed_domains.extend(args.allow_domains.clone());
    if let Some(timeout) = args.timeout {
        config.fetch_timeout = timeout;
    }
    config.validate()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    validate_url(&args.url, &config.allowed_domains)?;

    info!("Analysis in progress...");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout))
        .build()
        .context("Failed to build HTTP client")?;

    let text = fetch_log_text(&client, &args.url).await?;
    debug!("Got {} bytes of log text", text.len());

    let started = Instant::now();
    let extraction = extract_join_instants(&text);
    debug!(
        "Found {} join tokens ({} skipped)",
        extraction.token_count, extraction.skipped_tokens
    );

    let show_progress = progress_enabled(&config, &args);
    let stats = analyze_with_progress(&extraction.instants, |done| {
        if show_progress && done % PROGRESS_EVERY == 0 {
            eprint!("\rProcessed {} gaps...", done);
            let _ = std::io::stderr().flush();
        }
    })?;
    if show_progress && stats.join_count >= PROGRESS_EVERY {
        eprintln!("\rProcessed {} gaps.   ", stats.join_count);
    }

    let report = AnalysisReport::new(
        &args.url,
        extraction.log_date,
        stats,
        started.elapsed(),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

/// Progress output is cosmetic: off for JSON output and non-terminal stderr.
fn progress_enabled(config: &Config, args: &Args) -> bool {
    config.progress && !args.no_progress && !args.json && std::io::stderr().is_terminal()
}
