use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tower::Service;
use tracing_subscriber::EnvFilter;

use nm_bill_tracker::config::{
    DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILE, DEFAULT_SESSION_YEAR, DEFAULT_USER_AGENT,
};
use nm_bill_tracker::{
    ChamberCeilings, ScanStrategy, TrackReport, TrackRequest, TrackerConfig, TrackerError,
    TrackerService,
};

/// Scrape NM Legislature bill pages into a CSV
#[derive(Debug, Parser)]
#[command(name = "nm-bill-tracker", version)]
struct Args {
    /// Two-digit session year
    #[arg(long, default_value = DEFAULT_SESSION_YEAR)]
    year: String,

    /// Output CSV path
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Highest House bill number to probe
    #[arg(long, default_value_t = 400)]
    house_max: u32,

    /// Highest Senate bill number to probe
    #[arg(long, default_value_t = 350)]
    senate_max: u32,

    /// Consecutive misses that end a chamber scan
    #[arg(long, default_value_t = 50, conflicts_with = "bounded")]
    miss_threshold: u32,

    /// Probe every number up to the ceiling, ignoring misses
    #[arg(long)]
    bounded: bool,

    /// Delay between requests in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

impl Args {
    fn into_config(self) -> TrackerConfig {
        let strategy = if self.bounded {
            ScanStrategy::Bounded
        } else {
            ScanStrategy::EarlyStop {
                miss_threshold: self.miss_threshold,
            }
        };

        TrackerConfig::new(self.year)
            .with_base_url(self.base_url)
            .with_user_agent(self.user_agent)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_request_delay(Duration::from_millis(self.delay_ms))
            .with_ceilings(ChamberCeilings::new(self.house_max, self.senate_max))
            .with_strategy(strategy)
            .with_output_path(self.output)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Args::parse().into_config();

    println!("NM Legislative Bill Tracker");
    println!("{}", "=".repeat(60));
    println!("Scraping bills from the 20{} session...\n", config.session_year);

    match run(config).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(TrackerError::NoResults) => {
            println!("\nNo bills found.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: TrackerConfig) -> Result<TrackReport, TrackerError> {
    config.validate()?;
    let request = TrackRequest::from(config.clone());
    let mut service = TrackerService::new(config)?;
    service.call(request).await
}

fn print_summary(report: &TrackReport) {
    println!("\n{}", "=".repeat(60));
    println!("SUCCESS! Found {} bills", report.bills.len());
    for scan in &report.scans {
        println!(
            "  {}: {} bills, probed 1..={} ({:?})",
            scan.chamber.name(),
            scan.found,
            scan.last_probed,
            scan.stop_reason
        );
    }
    println!("Saved to: {}", report.output_path.display());
    println!("\nColumns included:");
    println!("  - Bill Number (with hyperlink to bill page)");
    println!("  - Title");
    println!("  - Sponsors (all co-sponsors, separated by semicolons)");
    println!("  - Status (last action)");
    println!("  - Current Location/Referral (committee assignment)");
    println!("  - Last Action Date");
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_match_defaults() {
        let args = Args::parse_from(["nm-bill-tracker"]);
        let config = args.into_config();
        let defaults = TrackerConfig::default();

        assert_eq!(config.session_year, defaults.session_year);
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.user_agent, defaults.user_agent);
        assert_eq!(config.timeout, defaults.timeout);
        assert_eq!(config.request_delay, defaults.request_delay);
        assert_eq!(config.ceilings, defaults.ceilings);
        assert_eq!(config.strategy, defaults.strategy);
        assert_eq!(config.output_path, defaults.output_path);
    }

    #[test]
    fn test_bounded_flag() {
        let args = Args::parse_from(["nm-bill-tracker", "--bounded", "--house-max", "10"]);
        let config = args.into_config();
        assert_eq!(config.strategy, ScanStrategy::Bounded);
        assert_eq!(config.ceilings.house, 10);
    }

    #[test]
    fn test_bounded_conflicts_with_threshold() {
        let result =
            Args::try_parse_from(["nm-bill-tracker", "--bounded", "--miss-threshold", "3"]);
        assert!(result.is_err());
    }
}
