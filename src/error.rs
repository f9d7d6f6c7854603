use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workbook could not be parsed: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    #[error("no ISIN column could be determined from headers or cell contents")]
    NoIsinColumn,

    #[error("missing ISIN parameter")]
    MissingIsin,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    /// Stable machine-readable kind for the structured error responses the
    /// HTTP glue serializes.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Http(_) => "transport",
            LookupError::Workbook(_) | LookupError::EmptyWorkbook => "parse",
            LookupError::NoIsinColumn => "schema",
            LookupError::MissingIsin => "invalid_input",
            LookupError::Config(_) => "config",
            LookupError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
