//! Schedule file parsing.
//!
//! The file is CSV with one header row followed by rows of
//! `first name, last name, specialty, date, slots`, where the slots column is itself a
//! comma-joined list. The header is skipped by position, never by content.

use super::model::Directory;
use super::slot::split_slots;
use crate::error::{ClinicError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const REQUIRED_FIELDS: usize = 5;

/// Load a directory from a schedule file on disk.
pub fn load_directory(path: impl AsRef<Path>) -> Result<Directory> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading doctor schedule");
    let file = File::open(path)?;
    parse_directory(file)
}

/// Parse a directory from any reader. Any malformed row fails the whole parse.
pub fn parse_directory<R: Read>(reader: R) -> Result<Directory> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut directory = Directory::new();
    let mut rows = 0usize;

    for record in csv_reader.records() {
        let record = record?;

        if record.len() < REQUIRED_FIELDS {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ClinicError::MalformedRow {
                line,
                found: record.len(),
            });
        }

        directory.insert_row(
            &record[0],
            &record[1],
            &record[2],
            &record[3],
            split_slots(&record[4]),
        );
        rows += 1;
    }

    debug!(rows, doctors = directory.len(), "Parsed doctor schedule");
    Ok(directory)
}
