//! Rule-based extractors for invoice references and metadata.

pub mod cases;
pub mod context;
pub mod dates;
pub mod folio;
pub mod orders;
pub mod patterns;

pub use cases::{extract_case_numbers, CaseExtractor};
pub use context::{clean_text, is_valid_context, ContextValidator};
pub use dates::{extract_emission_date, parse_dmy, EmissionDateExtractor};
pub use folio::{extract_invoice_number, FolioExtractor};
pub use orders::{extract_order_numbers, OrderExtractor};

/// Invoice number and `DD/MM/YYYY` emission date found in first-page text.
pub fn extract_invoice_metadata(text: &str) -> (Option<String>, Option<String>) {
    (extract_invoice_number(text), extract_emission_date(text))
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with the text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}
