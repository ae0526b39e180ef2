use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("the workbook is empty (no sheets found)")]
    EmptyWorkbook,

    #[error("no data rows found in the first sheet")]
    NoData,

    #[error("required columns not found (need a company or an emissions column). Available columns: {}", .headers.join(", "))]
    MissingRequiredColumns { headers: Vec<String> },

    #[error("no rows with energy consumption or emissions data found")]
    NoUsableRows,

    #[error("{0}")]
    NoValidRecords(String),

    #[error("numeric overflow: {0}")]
    Overflow(String),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("failed to load options from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid options: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
