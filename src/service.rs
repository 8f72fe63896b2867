use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tower::Service;
use tracing::info;

use crate::config::{ChamberCeilings, ScanStrategy, TrackerConfig};
use crate::error::TrackerError;
use crate::fetcher::HttpFetcher;
use crate::legislation::{BillRecord, BillTracker, ChamberScan};
use crate::output::write_bills;
use crate::traits::PageFetcher;

/// Track request: one full scan of a session.
#[derive(Debug, Clone)]
pub struct TrackRequest {
    pub session_year: String,
    pub ceilings: ChamberCeilings,
    pub strategy: ScanStrategy,
    pub request_delay: Duration,
    pub output_path: PathBuf,
}

impl Default for TrackRequest {
    fn default() -> Self {
        TrackerConfig::default().into()
    }
}

impl TrackRequest {
    pub fn new(session_year: impl Into<String>) -> Self {
        Self {
            session_year: session_year.into(),
            ..Default::default()
        }
    }

    pub fn with_ceilings(mut self, ceilings: ChamberCeilings) -> Self {
        self.ceilings = ceilings;
        self
    }

    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Apply the request on top of a base configuration (URL, user agent, timeout).
    fn into_config(self, base: &TrackerConfig) -> TrackerConfig {
        TrackerConfig {
            session_year: self.session_year,
            ceilings: self.ceilings,
            strategy: self.strategy,
            request_delay: self.request_delay,
            output_path: self.output_path,
            ..base.clone()
        }
    }
}

impl From<TrackerConfig> for TrackRequest {
    fn from(config: TrackerConfig) -> Self {
        Self {
            session_year: config.session_year,
            ceilings: config.ceilings,
            strategy: config.strategy,
            request_delay: config.request_delay,
            output_path: config.output_path,
        }
    }
}

/// Track result
#[derive(Debug)]
pub struct TrackReport {
    /// Bills in discovery order (House then Senate, ascending number)
    pub bills: Vec<BillRecord>,
    pub scans: Vec<ChamberScan>,
    pub output_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TrackReport {
    pub fn pages_probed(&self) -> u32 {
        self.scans.iter().map(|s| s.probed).sum()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Bill tracker exposed as a `tower::Service`.
///
/// Each call scans both chambers and writes the CSV. An empty scan answers
/// with [`TrackerError::NoResults`] and leaves any previous file untouched.
#[derive(Debug)]
pub struct TrackerService<F> {
    base: TrackerConfig,
    fetcher: Arc<F>,
}

impl<F> Clone for TrackerService<F> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl TrackerService<HttpFetcher> {
    /// Service backed by the real site.
    pub fn new(base: TrackerConfig) -> Result<Self, TrackerError> {
        let fetcher = HttpFetcher::new(&base)?;
        Ok(Self::with_fetcher(base, fetcher))
    }
}

impl<F: PageFetcher + 'static> TrackerService<F> {
    pub fn with_fetcher(base: TrackerConfig, fetcher: F) -> Self {
        Self {
            base,
            fetcher: Arc::new(fetcher),
        }
    }
}

impl<F: PageFetcher + 'static> Service<TrackRequest> for TrackerService<F> {
    type Response = TrackReport;
    type Error = TrackerError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: TrackRequest) -> Self::Future {
        info!(
            "Track request received: session={}, strategy={:?}",
            req.session_year, req.strategy
        );

        let config = req.into_config(&self.base);
        let fetcher = Arc::clone(&self.fetcher);

        Box::pin(async move {
            let started_at = Utc::now();
            let output_path = config.output_path.clone();

            let mut tracker = BillTracker::new(config, fetcher);
            let (bills, scans) = tracker.run().await?;

            write_bills(&output_path, &bills)?;

            let report = TrackReport {
                bills,
                scans,
                output_path,
                started_at,
                finished_at: Utc::now(),
            };

            info!(
                "Tracking complete: {} bills from {} pages in {}s",
                report.bills.len(),
                report.pages_probed(),
                report.elapsed().num_seconds()
            );

            Ok(report)
        })
    }
}
