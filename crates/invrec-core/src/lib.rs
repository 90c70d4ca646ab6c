//! Core library for invoice reference extraction and spreadsheet reconciliation.
//!
//! This crate provides:
//! - PDF text extraction
//! - Order and case number detection with keyword context validation
//! - Invoice number and emission date parsing
//! - Spreadsheet reconciliation of detected references
//! - The processing log written after each run

pub mod error;
pub mod models;
pub mod pdf;
pub mod invoice;
pub mod sheet;
pub mod report;

pub use error::{InvrecError, Result};
pub use models::config::{ExtractionConfig, InvrecConfig, SpreadsheetConfig};
pub use models::reference::{
    DetectedReferences, DocumentReferences, ExtractionSummary, FileOutcome, FileStatus,
    InvoiceMeta, ReferenceKind,
};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use invoice::{
    extract_document, extract_folder, list_pdf_files, BatchEvent, BatchExtractor, InvoiceParser,
    ReferenceParser,
};
pub use sheet::{reconcile, verify_saved, Cell, ReconcileStats, Table, Workbook};
pub use report::{write_report, write_report_file};
