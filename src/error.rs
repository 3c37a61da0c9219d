use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input file: {0}")]
    Input(String),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Report write error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
