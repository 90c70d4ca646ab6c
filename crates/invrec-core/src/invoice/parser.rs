//! Reference parser turning page texts into a document's references.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::reference::DocumentReferences;

use super::rules::{
    extract_invoice_metadata, CaseExtractor, ContextValidator, FieldExtractor, OrderExtractor,
};

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse references out of a document's page texts.
    fn parse(&self, pages: &[String]) -> DocumentReferences;
}

/// Rule-based parser for order and case references.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    orders: OrderExtractor,
    cases: CaseExtractor,
    preview_lines: usize,
}

impl ReferenceParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut orders = OrderExtractor::new();
        if config.require_order_context {
            orders = orders.with_context(
                ContextValidator::new(&config.order_keywords).with_window(config.context_window),
            );
        }

        Self {
            orders,
            cases: CaseExtractor::from_config(config),
            preview_lines: config.preview_lines,
        }
    }

    /// Set how many leading lines are kept as a preview.
    pub fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for ReferenceParser {
    fn parse(&self, pages: &[String]) -> DocumentReferences {
        let first_page = pages.first().map(String::as_str).unwrap_or("");

        let (invoice_number, emission_date) = extract_invoice_metadata(first_page);
        debug!("Invoice number: {:?}, emission date: {:?}", invoice_number, emission_date);

        let mut full_text = String::new();
        for page in pages.iter().filter(|p| !p.is_empty()) {
            full_text.push_str(page);
            full_text.push('\n');
        }

        let orders: Vec<String> = self
            .orders
            .extract_all(&full_text)
            .into_iter()
            .map(|m| {
                debug!("Order number {} in: {}", m.value, m.source);
                m.value
            })
            .collect();

        let cases: Vec<String> = self
            .cases
            .extract_all(&full_text)
            .into_iter()
            .map(|m| {
                debug!("Case number {} in: {}", m.value, m.source);
                m.value
            })
            .collect();

        let preview = full_text
            .split('\n')
            .take(self.preview_lines)
            .map(str::to_string)
            .collect();

        DocumentReferences {
            invoice_number,
            emission_date,
            orders,
            cases,
            preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic_invoice() {
        let doc = ReferenceParser::new().parse(&pages(&[
            "FACTURA\nFolio A123456\nFecha emisión 2024-03-05 10:00:00\n",
            "Servicio realizado 5100912345\nArrastre de grúa expediente 12345678\n",
        ]));

        assert_eq!(doc.invoice_number.as_deref(), Some("A123456"));
        assert_eq!(doc.emission_date.as_deref(), Some("05/03/2024"));
        assert_eq!(doc.orders, vec!["5100912345".to_string()]);
        assert_eq!(doc.cases, vec!["12345678".to_string()]);
        assert!(doc.has_references());
    }

    #[test]
    fn test_metadata_only_from_first_page() {
        let doc = ReferenceParser::new().parse(&pages(&[
            "Sin datos",
            "Folio A999\nFecha emisión 2024-01-01 00:00:00\n5100800001",
        ]));

        assert_eq!(doc.invoice_number, None);
        assert_eq!(doc.emission_date, None);
        assert_eq!(doc.orders, vec!["5100800001".to_string()]);
        assert_eq!(doc.invoice_meta(), None);
    }

    #[test]
    fn test_preview_limited() {
        let text = (1..=20).map(|i| format!("linea {}", i)).collect::<Vec<_>>().join("\n");
        let doc = ReferenceParser::new().parse(&[text]);

        assert!(!doc.has_references());
        assert_eq!(doc.preview.len(), 10);
        assert_eq!(doc.preview[0], "linea 1");
        assert_eq!(doc.preview[9], "linea 10");
    }

    #[test]
    fn test_skips_empty_pages() {
        let doc = ReferenceParser::new()
            .with_preview_lines(3)
            .parse(&pages(&["", "uno\ndos", ""]));
        assert_eq!(doc.preview, vec!["uno".to_string(), "dos".to_string(), String::new()]);
    }

    #[test]
    fn test_strict_order_context() {
        let config = ExtractionConfig {
            require_order_context: true,
            ..ExtractionConfig::default()
        };
        let doc = ReferenceParser::from_config(&config).parse(&pages(&[
            "Pedido de compra 5100912345\nImporte 5100854321",
        ]));

        assert_eq!(doc.orders, vec!["5100912345".to_string()]);
    }

    #[test]
    fn test_idempotent() {
        let input = pages(&["Folio A1\nEXP 12345678 5100912345"]);
        let parser = ReferenceParser::new();
        assert_eq!(parser.parse(&input), parser.parse(&input));
    }
}
