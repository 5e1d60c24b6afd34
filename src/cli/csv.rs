//! # CSV Record Reader
//!
//! Reads `key,value` records for bulk loading. One record per line, fields
//! trimmed of surrounding whitespace, key parsed as a base-10 integer and
//! range-checked against `i32`. Lines that do not parse as records — blank
//! lines, header rows, junk — are skipped rather than treated as errors, so
//! a file with a `key,value` header loads cleanly without any rewind
//! probing.
//!
//! Sortedness is not checked here; the bulk builder enforces it where the
//! order actually matters.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use eyre::{Result, WrapErr};

/// Parses a single `key,value` line. Returns `None` for anything that is
/// not a well-formed record with an in-range key.
pub fn parse_record(line: &str) -> Option<(i32, String)> {
    let (key_text, value_text) = line.split_once(',')?;
    let key: i64 = key_text.trim().parse().ok()?;
    if key < i32::MIN as i64 || key > i32::MAX as i64 {
        return None;
    }
    Some((key as i32, value_text.trim().to_string()))
}

/// Reads every well-formed record from a CSV file, in file order.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<(i32, String)>> {
    let path = path.as_ref();
    let file = File::open(path)
        .wrap_err_with(|| format!("could not open csv file '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        if let Some(record) = parse_record(&line) {
            records.push(record);
        }
    }
    Ok(records)
}
