use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a plot from being produced.
///
/// All variants are fatal; the binaries report them and exit with status 1.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("CSV file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("CSV must contain columns: {required:?}, found columns: {found:?}")]
    SchemaMismatch {
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirectoryMissing(PathBuf),

    #[error("Unsupported output format: {} (expected .png, .svg or .pdf)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid chart configuration: {0}")]
    Config(String),

    #[error("Error processing file: {0}")]
    Unclassified(String),
}

impl From<csv::Error> for PlotError {
    fn from(err: csv::Error) -> Self {
        PlotError::Unclassified(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
