//! Order number (pedido) extraction.
//!
//! Order numbers are 10-digit codes starting with `51008` or `51009`. They are
//! accepted on the prefix alone unless a [`ContextValidator`] is attached, in
//! which case the surrounding line must carry an order keyword the same way
//! case numbers must.

use super::context::ContextValidator;
use super::patterns::ORDER_NUMBER;
use super::{ExtractionMatch, FieldExtractor};

/// Order number extractor.
#[derive(Debug, Clone, Default)]
pub struct OrderExtractor {
    validator: Option<ContextValidator>,
}

impl OrderExtractor {
    /// Create an extractor that accepts any prefixed 10-digit token.
    pub fn new() -> Self {
        Self { validator: None }
    }

    /// Require keyword context around each order number.
    pub fn with_context(mut self, validator: ContextValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl FieldExtractor for OrderExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in ORDER_NUMBER.find_iter(text) {
            let number = m.as_str();

            if results.iter().any(|r| r.value == number) {
                continue;
            }

            let line = enclosing_line(text, m.start(), m.end());
            if let Some(validator) = &self.validator {
                if !validator.is_valid(line, number) {
                    continue;
                }
            }

            results.push(ExtractionMatch::new(number.to_string(), line.trim()));
        }

        results
    }
}

/// Extract distinct order numbers from text, in first-seen order.
pub fn extract_order_numbers(text: &str) -> Vec<String> {
    OrderExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

fn enclosing_line(text: &str, start: usize, end: usize) -> &str {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[end..].find('\n').map(|i| end + i).unwrap_or(text.len());
    &text[line_start..line_end]
}
