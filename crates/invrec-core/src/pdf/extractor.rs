//! PDF text extraction using lopdf and pdf-extract.

use std::panic;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Per-page text through lopdf's own content-stream decoder.
    fn extract_pages_lopdf(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        let mut pages = Vec::new();

        for page_num in doc.get_pages().keys() {
            let text = doc.extract_text(&[*page_num]).map_err(|e| {
                PdfError::TextExtraction(format!("page {}: {}", page_num, e))
            })?;
            pages.push(text);
        }

        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        let page_count = self.document()?.get_pages().len();
        let data = self.raw_data.as_slice();

        // pdf-extract panics on some malformed font programs
        let extracted = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(data));

        match extracted {
            Ok(Ok(pages)) if pages.len() == page_count => {
                trace!("pdf-extract returned {} pages", pages.len());
                Ok(pages)
            }
            // pdf-extract stops at the first page it cannot decode
            Ok(Ok(pages)) => {
                warn!(
                    "pdf-extract read {} of {} pages, falling back to lopdf",
                    pages.len(),
                    page_count
                );
                self.extract_pages_lopdf()
            }
            Ok(Err(e)) => {
                warn!("pdf-extract failed ({}), falling back to lopdf", e);
                self.extract_pages_lopdf()
            }
            Err(_) => {
                warn!("pdf-extract panicked, falling back to lopdf");
                self.extract_pages_lopdf()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{
        empty_password_pdf, password_protected_pdf, pdf_without_base_font, pdf_without_pages,
        text_pdf,
    };

    fn load(data: &[u8]) -> Result<PdfExtractor> {
        let mut extractor = PdfExtractor::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert!(extractor.raw_data.is_empty());
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_pages(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_extract_pages_in_order() {
        let extractor = load(&text_pdf(&[&["Folio A42"], &["Pedido 5100912345"]])).unwrap();

        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Folio A42"));
        assert!(pages[1].contains("5100912345"));
    }

    #[test]
    fn test_load_garbage() {
        assert!(matches!(load(b"definitely not a pdf"), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_empty_page_tree() {
        assert!(matches!(load(&pdf_without_pages()), Err(PdfError::NoPages)));
    }

    #[test]
    fn test_load_decrypts_empty_password() {
        let data = empty_password_pdf(&[&["Pedido 5100912345"]]);
        assert!(Document::load_mem(&data).unwrap().is_encrypted());

        let extractor = load(&data).unwrap();
        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("5100912345"));
    }

    #[test]
    fn test_load_rejects_user_password() {
        let data = password_protected_pdf(&[&["Pedido 5100912345"]]);
        assert!(matches!(load(&data), Err(PdfError::Encrypted)));
    }

    #[test]
    fn test_falls_back_to_lopdf() {
        let extractor = load(&pdf_without_base_font(&[&["Folio B7"], &["Expediente 12345678"]])).unwrap();

        let pages = extractor.extract_pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Folio B7"));
        assert!(pages[1].contains("12345678"));
    }
}
