//! Bill enumeration driver

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

use crate::config::{ScanStrategy, TrackerConfig};
use crate::error::TrackerError;
use crate::traits::PageFetcher;

use super::parser::parse_bill_page;
use super::types::{BillNumber, BillRecord, Chamber};

/// Characters of the title shown on a progress line
const PROGRESS_TITLE_CHARS: usize = 40;

/// Why a chamber scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Reached the chamber ceiling
    Ceiling,
    /// Hit the consecutive-miss threshold
    MissThreshold,
}

/// Per-chamber scan statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChamberScan {
    pub chamber: Chamber,
    /// Pages requested
    pub probed: u32,
    pub found: u32,
    /// Last bill number requested (0 if none)
    pub last_probed: u32,
    pub stop_reason: StopReason,
}

/// Walks House then Senate bill numbers, fetching and parsing each page.
pub struct BillTracker<F> {
    config: TrackerConfig,
    fetcher: F,
    requests_sent: u64,
}

impl<F: PageFetcher> BillTracker<F> {
    pub fn new(config: TrackerConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            requests_sent: 0,
        }
    }

    /// Bill page URL for a chamber/number in the configured session.
    pub fn bill_url(&self, number: BillNumber) -> Result<String, TrackerError> {
        let url = Url::parse_with_params(
            &self.config.base_url,
            &[
                ("chamber", number.chamber.code().to_string()),
                ("legType", "B".to_string()),
                ("legNo", number.number.to_string()),
                ("year", self.config.session_year.clone()),
            ],
        )?;
        Ok(url.into())
    }

    /// Fetch and parse one bill. `Ok(None)` is a miss.
    pub async fn scrape_bill(
        &mut self,
        number: BillNumber,
    ) -> Result<Option<BillRecord>, TrackerError> {
        let url = self.bill_url(number)?;

        self.pace().await;
        debug!("Fetching {}", url);
        let html = self.fetcher.fetch(&url).await;
        self.requests_sent += 1;

        Ok(parse_bill_page(html.as_deref())
            .map(|parsed| BillRecord::from_parsed(parsed, number, url)))
    }

    /// Scan one chamber, appending hits to `bills` in ascending number order.
    pub async fn scan_chamber(
        &mut self,
        chamber: Chamber,
        bills: &mut Vec<BillRecord>,
    ) -> Result<ChamberScan, TrackerError> {
        let ceiling = self.config.ceilings.for_chamber(chamber);
        let strategy = self.config.strategy;

        info!("{} Bills:", chamber.name());

        let mut scan = ChamberScan {
            chamber,
            probed: 0,
            found: 0,
            last_probed: 0,
            stop_reason: StopReason::Ceiling,
        };
        let mut consecutive_misses: u32 = 0;

        for n in 1..=ceiling {
            let record = self.scrape_bill(BillNumber::new(chamber, n)).await?;
            scan.probed += 1;
            scan.last_probed = n;

            match record {
                Some(bill) => {
                    consecutive_misses = 0;
                    scan.found += 1;
                    info!(
                        "  ✓ {}: {}... ({})",
                        bill.bill_id,
                        truncate_chars(&bill.title, PROGRESS_TITLE_CHARS),
                        bill.first_sponsor()
                    );
                    bills.push(bill);
                }
                None => {
                    consecutive_misses += 1;
                    if let ScanStrategy::EarlyStop { miss_threshold } = strategy {
                        if consecutive_misses >= miss_threshold {
                            debug!(
                                "{} consecutive misses at {}{}, stopping {} scan",
                                consecutive_misses,
                                chamber.code(),
                                n,
                                chamber.name()
                            );
                            scan.stop_reason = StopReason::MissThreshold;
                            break;
                        }
                    }
                }
            }
        }

        info!("  Found {} {} bills", scan.found, chamber.name());
        Ok(scan)
    }

    /// Scan every chamber in order; records come back in discovery order.
    pub async fn run(&mut self) -> Result<(Vec<BillRecord>, Vec<ChamberScan>), TrackerError> {
        self.config.validate()?;

        let mut bills = Vec::new();
        let mut scans = Vec::with_capacity(Chamber::ALL.len());
        for chamber in Chamber::ALL {
            scans.push(self.scan_chamber(chamber, &mut bills).await?);
        }
        Ok((bills, scans))
    }

    /// Fixed delay between consecutive requests; nothing before the first.
    async fn pace(&self) {
        let delay = self.config.request_delay;
        if self.requests_sent > 0 && delay > Duration::ZERO {
            sleep(delay).await;
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
