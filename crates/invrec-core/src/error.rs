//! Error types for the invrec-core library.

use thiserror::Error;

/// Main error type for the invrec library.
#[derive(Error, Debug)]
pub enum InvrecError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Reference extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet read/write or reconciliation error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to reference extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The invoice folder does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Failed to list the invoice folder.
    #[error("failed to read folder {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the spreadsheet stage.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Failed to open or parse the workbook.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// Only `.xlsx` workbooks can be rewritten in place.
    #[error("unsupported spreadsheet format: {0} (expected .xlsx)")]
    UnsupportedFormat(String),

    /// The requested worksheet does not exist.
    #[error("worksheet not found: {0}")]
    MissingSheet(String),

    /// The workbook has no worksheets at all.
    #[error("workbook has no worksheets")]
    Empty,

    /// A required column is absent from the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Failed to serialize or persist the workbook.
    #[error("failed to write workbook: {0}")]
    Write(String),
}

impl From<rust_xlsxwriter::XlsxError> for SpreadsheetError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Write(err.to_string())
    }
}

/// Result type for the invrec library.
pub type Result<T> = std::result::Result<T, InvrecError>;
