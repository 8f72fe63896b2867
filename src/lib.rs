//! NM Legislature bill tracker
//!
//! - Probes House and Senate bill pages on nmlegis.gov for one session
//! - Extracts title, sponsors, referral and last action from each page
//! - Writes everything to a CSV with a fixed name for spreadsheet import
//!
//! # Usage
//!
//! ```rust,ignore
//! use nm_bill_tracker::{TrackRequest, TrackerConfig, TrackerService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = TrackerService::new(TrackerConfig::default()).unwrap();
//!
//!     let request = TrackRequest::new("26").with_output_path("bills.csv");
//!
//!     let report = service.call(request).await.unwrap();
//!     println!("Bills found: {}", report.bills.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod legislation;
pub mod output;
pub mod service;
pub mod traits;

pub use config::{ChamberCeilings, ScanStrategy, TrackerConfig};
pub use error::TrackerError;
pub use fetcher::HttpFetcher;
pub use legislation::{BillRecord, BillTracker, Chamber, ChamberScan};
pub use output::write_bills;
pub use service::{TrackReport, TrackRequest, TrackerService};
pub use traits::PageFetcher;
