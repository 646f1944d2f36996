//! Output formatting, CSV export and run reports

pub mod csv_export;
pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::RunReport;
