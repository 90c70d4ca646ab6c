//! Invoice number (folio) extraction.

use super::patterns::FOLIO;
use super::{ExtractionMatch, FieldExtractor};

/// Folio field extractor.
pub struct FolioExtractor;

impl FolioExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FolioExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for FolioExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        FOLIO
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                Some(ExtractionMatch::new(format!("A{}", &caps[1]), full_match.as_str()))
            })
            .collect()
    }
}

/// Extract the invoice number from first-page text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    FolioExtractor::new().extract(text).map(|m| m.value)
}
