//! Case number (expediente) extraction.

use super::context::ContextValidator;
use super::patterns::CASE_CANDIDATE;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Case number extractor.
///
/// Every standalone 8-digit token is a candidate; it is kept only when it is
/// not an excluded code and a case keyword sits next to it on the same line.
#[derive(Debug, Clone)]
pub struct CaseExtractor {
    validator: ContextValidator,
    excluded: Vec<String>,
}

impl CaseExtractor {
    /// Create an extractor from explicit keywords and exclusions.
    pub fn new<S: AsRef<str>>(keywords: &[S], excluded: &[S]) -> Self {
        Self {
            validator: ContextValidator::new(keywords),
            excluded: excluded.iter().map(|s| s.as_ref().trim().to_string()).collect(),
        }
    }

    /// Create an extractor from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.case_keywords, &config.excluded_case_numbers)
            .with_window(config.context_window)
    }

    /// Set the keyword window size.
    pub fn with_window(mut self, window: usize) -> Self {
        self.validator = self.validator.with_window(window);
        self
    }

    fn is_excluded(&self, number: &str) -> bool {
        self.excluded.iter().any(|e| e == number)
    }
}

impl Default for CaseExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl FieldExtractor for CaseExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for line in text.lines() {
            for m in CASE_CANDIDATE.find_iter(line) {
                let number = m.as_str();

                if self.is_excluded(number) || results.iter().any(|r| r.value == number) {
                    continue;
                }
                if !self.validator.is_valid(line, number) {
                    continue;
                }

                results.push(ExtractionMatch::new(number.to_string(), line.trim()));
            }
        }

        results
    }
}

/// Extract distinct case numbers with the default keyword list.
pub fn extract_case_numbers(text: &str) -> Vec<String> {
    CaseExtractor::default()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_with_keyword() {
        let text = "Arrastre de grúa expediente 12345678\nTotal 87654321";
        assert_eq!(extract_case_numbers(text), vec!["12345678".to_string()]);
    }

    #[test]
    fn test_sentinel_never_extracted() {
        let text = "EXPEDIENTE 78101803\nSINIESTRO 78101803 GRUA";
        assert!(extract_case_numbers(text).is_empty());
    }

    #[test]
    fn test_keyword_on_other_line_does_not_count() {
        let text = "EXPEDIENTE\n12345678";
        assert!(extract_case_numbers(text).is_empty());
    }

    #[test]
    fn test_deduplicates() {
        let text = "EXP 12345678\nSINIESTRO 12345678\nEXPTE 23456789";
        assert_eq!(
            extract_case_numbers(text),
            vec!["12345678".to_string(), "23456789".to_string()]
        );
    }

    #[test]
    fn test_ignores_longer_numbers() {
        assert!(extract_case_numbers("EXPEDIENTE 1234567890").is_empty());
        assert!(extract_case_numbers("EXPEDIENTE 1234567").is_empty());
    }

    #[test]
    fn test_custom_exclusions() {
        let extractor = CaseExtractor::new(&["EXP"], &["12345678"]);
        let found: Vec<String> = extractor
            .extract_all("EXP 12345678 EXP 23456789")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(found, vec!["23456789".to_string()]);
    }

    #[test]
    fn test_records_source_line() {
        let found = CaseExtractor::default().extract("  Siniestro: 11112222  ").unwrap();
        assert_eq!(found.source, "Siniestro: 11112222");
    }
}
