//! Error types for report output.

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to build workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
