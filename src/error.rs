use thiserror::Error;

/// Error type for the whole report pipeline.
///
/// Every variant aborts the generation call; join misses are not errors
/// (they are dropped and counted, see `ReportMetrics::unmatched_sales`).
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing sheet: {0}")]
    MissingSheet(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Empty sheet: {0}")]
    EmptySheet(String),

    #[error("Non-numeric value in column '{column}' at row {row}")]
    NonNumeric { column: String, row: usize },

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Cannot chart empty series: {0}")]
    EmptySeries(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
