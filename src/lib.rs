//! Spreadsheet-to-PDF sales reporting.
//!
//! Reads a workbook with a "Sales" and an "Inventory" sheet, derives
//! revenue, profit, average-discount and remaining-stock figures, renders
//! three charts, and composes everything into a one-page landscape PDF.
//!
//! The pipeline is synchronous and all-or-nothing: a call to
//! [`ReportGenerator::generate`] either returns the finished PDF or a
//! single [`ReportError`].

pub mod aggregation;
pub mod chart;
pub mod compose;
pub mod currency;
pub mod error;
pub mod metrics;
pub mod report;
pub mod schema;
pub mod workbook;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use aggregation::{NamedSeries, StockRow};
pub use chart::{ChartKind, ChartRenderer, PlottersRenderer};
pub use error::ReportError;
pub use metrics::ReportMetrics;
pub use report::{GeneratedReport, ReportConfig, ReportGenerator};
