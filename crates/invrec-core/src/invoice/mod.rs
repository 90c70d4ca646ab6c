//! Invoice reference extraction module.

mod batch;
mod parser;
pub mod rules;

pub use batch::{extract_document, extract_folder, list_pdf_files, BatchEvent, BatchExtractor};
pub use parser::{InvoiceParser, ReferenceParser};
pub use rules::{extract_case_numbers, extract_invoice_metadata, extract_order_numbers, is_valid_context};
