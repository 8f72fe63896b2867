//! CSV export

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::TrackerError;
use crate::legislation::{BillRecord, BillRow};

/// Write `bills` to `path`, replacing any previous file.
///
/// Rows are written to a temporary file in the same directory, which is then
/// renamed over `path`; a failed run leaves the previous file as it was.
/// Returns the number of rows written. An empty slice writes nothing and
/// yields [`TrackerError::NoResults`].
pub fn write_bills(path: &Path, bills: &[BillRecord]) -> Result<usize, TrackerError> {
    if bills.is_empty() {
        return Err(TrackerError::NoResults);
    }

    let output_err = |source: io::Error| TrackerError::Output {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| TrackerError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(output_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for bill in bills {
            writer.serialize(BillRow::from(bill)).map_err(csv_err)?;
        }
        writer.flush().map_err(output_err)?;
    }
    tmp.persist(path).map_err(|e| output_err(e.error))?;

    info!("Saved {} bills to {}", bills.len(), path.display());
    Ok(bills.len())
}

/// Read rows back from a file written by [`write_bills`].
pub fn read_rows(path: &Path) -> Result<Vec<BillRow>, TrackerError> {
    let csv_err = |source: csv::Error| TrackerError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<BillRow>, _>>()
        .map_err(csv_err)
}
