//! CSV ingest for the paired input series.
//!
//! The expected shape is two numeric columns per row, first series then
//! second, with an optional header line. This module only parses; whether
//! missing values abort the run or drop rows is decided later by the
//! missing-data policy.
//!
//! Design goals:
//! - **Lenient cells**: empty, `nan`, and `na` all mean "missing" (NaN)
//! - **Strict rows**: a row without two cells is an error, not a skip
//! - **Line-numbered errors** so bad files are easy to fix

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::ProfileError;

/// Read the two series from a CSV file on disk.
pub fn load_series_pair(path: &Path) -> Result<(Vec<f64>, Vec<f64>), ProfileError> {
    let file = File::open(path)
        .map_err(|e| ProfileError::ingest(format!("failed to open '{}': {e}", path.display())))?;
    read_series_pair(file)
}

/// Read the two series from any CSV source.
///
/// The first record is treated as a header when either of its first two
/// cells is non-numeric text, so both headered and bare files work.
pub fn read_series_pair<R: Read>(source: R) -> Result<(Vec<f64>, Vec<f64>), ProfileError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(source);

    let mut a = Vec::new();
    let mut b = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts at the first file line here because header
        // detection is done by hand; CSV lines are 1-based.
        let line = idx + 1;

        let record =
            result.map_err(|e| ProfileError::ingest(format!("line {line}: {e}")))?;

        if idx == 0 && looks_like_header(&record) {
            continue;
        }

        let (va, vb) = parse_pair(&record)
            .map_err(|msg| ProfileError::ingest(format!("line {line}: {msg}")))?;
        a.push(va);
        b.push(vb);
    }

    if a.is_empty() {
        return Err(ProfileError::ingest("no data rows in input"));
    }

    Ok((a, b))
}

fn looks_like_header(record: &StringRecord) -> bool {
    record
        .iter()
        .take(2)
        .any(|cell| !cell.is_empty() && parse_cell(cell).is_err())
}

fn parse_pair(record: &StringRecord) -> Result<(f64, f64), String> {
    if record.len() < 2 {
        return Err(format!("expected two columns, got {}", record.len()));
    }
    // Extra columns are tolerated so annotated exports still load.
    let a = parse_cell(&record[0]).map_err(|msg| format!("column 1: {msg}"))?;
    let b = parse_cell(&record[1]).map_err(|msg| format!("column 2: {msg}"))?;
    Ok((a, b))
}

fn parse_cell(cell: &str) -> Result<f64, String> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| format!("not a number: '{cell}'"))
}
