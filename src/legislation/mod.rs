//! NM Legislature bill pages
//!
//! Enumerates bill numbers per chamber, fetches each page and extracts the
//! tracked fields.

mod parser;
mod tracker;
mod types;

pub use parser::{last_action, parse_bill_page, sponsors, MAX_SPONSOR_SLOT};
pub use tracker::{BillTracker, ChamberScan, StopReason};
pub use types::{
    BillNumber, BillRecord, BillRow, Chamber, ParsedBill, ACTION_DATE_FORMAT, SPONSOR_SEPARATOR,
};
