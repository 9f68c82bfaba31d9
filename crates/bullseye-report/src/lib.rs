//! Match reports for bullseye scoring.
//!
//! - **Payload**: per-shooter scores, subtotals and aggregates for a match
//! - **Table**: the header/row matrix shown on screen and in the summary sheet
//! - **Workbook**: `.xlsx` rendering with a detail sheet per shooter
//! - **Export**: CSV of the table and JSON of the payload

pub mod display;
pub mod error;
pub mod export;
pub mod payload;
pub mod table;
pub mod xlsx;

pub use display::NO_DATA;
pub use error::{ReportError, Result};
pub use export::{write_report_json, write_table_csv};
pub use payload::{MatchReport, ScoreEntry, ShooterReport, build_match_report};
pub use table::{HeaderCell, Layout, ReportCell, ReportRow, ReportTable, build_report_table};
pub use xlsx::{ReportOptions, SUMMARY_SHEET, render_workbook, sheet_names};
