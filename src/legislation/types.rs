//! Bill types

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Separator used when the sponsor list is flattened into one cell.
pub const SPONSOR_SEPARATOR: &str = "; ";

/// Date format printed after "Calendar Day:" on bill pages.
pub const ACTION_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    /// Scan order: House first, then Senate.
    pub const ALL: [Chamber; 2] = [Chamber::House, Chamber::Senate];

    /// Single-letter code used in URLs and identifiers.
    pub fn code(self) -> char {
        match self {
            Chamber::House => 'H',
            Chamber::Senate => 'S',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Chamber::House => "House",
            Chamber::Senate => "Senate",
        }
    }
}

/// Chamber plus sequential number within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BillNumber {
    pub chamber: Chamber,
    pub number: u32,
}

impl BillNumber {
    pub fn new(chamber: Chamber, number: u32) -> Self {
        Self { chamber, number }
    }
}

impl fmt::Display for BillNumber {
    /// `HB0001`, `SB0123`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B{:04}", self.chamber.code(), self.number)
    }
}

/// Fields pulled out of one bill page, before the driver attaches the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBill {
    /// Official identifier printed on the page; may be empty
    pub bill_id: String,
    pub title: String,
    pub sponsors: Vec<String>,
    pub status: String,
    pub location: String,
    pub last_action_date: String,
}

/// One valid bill found during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRecord {
    pub bill_id: String,
    pub title: String,
    pub sponsors: Vec<String>,
    pub status: String,
    pub location: String,
    /// `MM/DD/YYYY` as printed by the site, or empty
    pub last_action_date: String,
    pub url: String,
}

impl BillRecord {
    /// Prefers the page's own identifier and falls back to the probed number.
    pub fn from_parsed(parsed: ParsedBill, number: BillNumber, url: String) -> Self {
        let bill_id = if parsed.bill_id.is_empty() {
            number.to_string()
        } else {
            parsed.bill_id
        };
        Self {
            bill_id,
            title: parsed.title,
            sponsors: parsed.sponsors,
            status: parsed.status,
            location: parsed.location,
            last_action_date: parsed.last_action_date,
            url,
        }
    }

    pub fn sponsors_joined(&self) -> String {
        self.sponsors.join(SPONSOR_SEPARATOR)
    }

    pub fn first_sponsor(&self) -> &str {
        self.sponsors.first().map(String::as_str).unwrap_or_default()
    }

    /// Anchor rendered as a link by the chart tool consuming the CSV.
    pub fn bill_link(&self) -> String {
        format!(
            "<a href=\"{}\" target=\"_blank\">{}</a>",
            self.url, self.bill_id
        )
    }

    pub fn last_action_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.last_action_date, ACTION_DATE_FORMAT).ok()
    }
}

/// CSV row; column order and header labels are part of the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRow {
    #[serde(rename = "Bill Number")]
    pub bill_number: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Sponsors")]
    pub sponsors: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Current Location/Referral")]
    pub location: String,
    #[serde(rename = "Last Action Date")]
    pub last_action_date: String,
}

impl From<&BillRecord> for BillRow {
    fn from(record: &BillRecord) -> Self {
        Self {
            bill_number: record.bill_link(),
            title: record.title.clone(),
            sponsors: record.sponsors_joined(),
            status: record.status.clone(),
            location: record.location.clone(),
            last_action_date: record.last_action_date.clone(),
        }
    }
}
