use std::path::PathBuf;
use std::time::Duration;

use crate::error::TrackerError;
use crate::legislation::Chamber;

pub const DEFAULT_BASE_URL: &str = "https://www.nmlegis.gov/Legislation/Legislation";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";
pub const DEFAULT_SESSION_YEAR: &str = "26";
/// Kept stable across runs; the published sheet imports it by path.
pub const DEFAULT_OUTPUT_FILE: &str = "bills.csv";

/// How the driver decides that a chamber has been scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Probe every number up to the chamber ceiling.
    Bounded,
    /// Stop a chamber after `miss_threshold` consecutive misses (or at the ceiling).
    EarlyStop { miss_threshold: u32 },
}

impl Default for ScanStrategy {
    fn default() -> Self {
        ScanStrategy::EarlyStop { miss_threshold: 50 }
    }
}

/// Highest bill number probed per chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChamberCeilings {
    pub house: u32,
    pub senate: u32,
}

impl Default for ChamberCeilings {
    fn default() -> Self {
        // 2026 session: HB runs to ~380, SB to ~320
        Self {
            house: 400,
            senate: 350,
        }
    }
}

impl ChamberCeilings {
    pub fn new(house: u32, senate: u32) -> Self {
        Self { house, senate }
    }

    pub fn for_chamber(&self, chamber: Chamber) -> u32 {
        match chamber {
            Chamber::House => self.house,
            Chamber::Senate => self.senate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Two-digit session year (`"26"` for 2026)
    pub session_year: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause between consecutive requests
    pub request_delay: Duration,
    pub ceilings: ChamberCeilings,
    pub strategy: ScanStrategy,
    pub output_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            session_year: DEFAULT_SESSION_YEAR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(200),
            ceilings: ChamberCeilings::default(),
            strategy: ScanStrategy::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl TrackerConfig {
    pub fn new(session_year: impl Into<String>) -> Self {
        Self {
            session_year: session_year.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_ceilings(mut self, ceilings: ChamberCeilings) -> Self {
        self.ceilings = ceilings;
        self
    }

    pub fn with_strategy(mut self, strategy: ScanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Rejects values that would make the scan meaningless.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let year = self.session_year.as_str();
        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrackerError::InvalidConfig(format!(
                "session year must be two digits, got {:?}",
                year
            )));
        }
        url::Url::parse(&self.base_url)?;
        if let ScanStrategy::EarlyStop { miss_threshold: 0 } = self.strategy {
            return Err(TrackerError::InvalidConfig(
                "miss threshold must be at least 1".into(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(TrackerError::InvalidConfig("output path is empty".into()));
        }
        Ok(())
    }
}
