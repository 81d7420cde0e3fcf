use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use csv::{ReaderBuilder, Trim};
use hashbrown::HashSet;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PlotError, Result};

/// Reads a whole CSV file with a header row into memory.
///
/// Rows are deserialized by column name, so columns other than `required`
/// are ignored. Fails with `EmptyInput` when the file has no header or no
/// data rows and with `SchemaMismatch` when a required column is absent.
pub fn load_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    println!("Loading data from: {}", path.display());

    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => PlotError::FileNotFound(path.to_path_buf()),
        _ => PlotError::Unclassified(err.to_string()),
    })?;
    let reader = BufReader::new(file);
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(PlotError::EmptyInput(path.to_path_buf()));
    }
    check_columns(&headers, required)?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(PlotError::EmptyInput(path.to_path_buf()));
    }

    debug!("Parsed {} rows with columns {:?}", rows.len(), headers);
    println!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    let found: HashSet<&str> = headers.iter().collect();
    if required.iter().all(|column| found.contains(column)) {
        return Ok(());
    }
    Err(PlotError::SchemaMismatch {
        required: required.iter().map(|c| c.to_string()).collect(),
        found: headers.iter().map(str::to_string).collect(),
    })
}
