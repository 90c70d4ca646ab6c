//! Reference numbers, invoice metadata and per-run extraction results.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of reference number found on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// 10-digit purchase/service order number (pedido).
    Order,
    /// 8-digit incident case number (expediente).
    Case,
}

/// Invoice identification taken from the first page of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceMeta {
    /// Invoice identifier, e.g. `A123456`.
    pub folio: String,
    /// Emission date as `DD/MM/YYYY`, empty when not found.
    pub fecha: String,
}

/// Everything extracted from a single PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentReferences {
    /// Invoice number found on the first page.
    pub invoice_number: Option<String>,
    /// Normalized emission date found on the first page.
    pub emission_date: Option<String>,
    /// Order numbers in first-seen order, without duplicates.
    pub orders: Vec<String>,
    /// Case numbers in first-seen order, without duplicates.
    pub cases: Vec<String>,
    /// Leading lines of the document text.
    pub preview: Vec<String>,
}

impl DocumentReferences {
    /// True when at least one order or case number was found.
    pub fn has_references(&self) -> bool {
        !self.orders.is_empty() || !self.cases.is_empty()
    }

    /// Invoice metadata to associate with this document's references.
    ///
    /// Only documents carrying an invoice number produce metadata.
    pub fn invoice_meta(&self) -> Option<InvoiceMeta> {
        self.invoice_number.as_ref().map(|folio| InvoiceMeta {
            folio: folio.clone(),
            fecha: self.emission_date.clone().unwrap_or_default(),
        })
    }
}

/// Result of processing one file of the batch.
#[derive(Debug, Clone)]
pub enum FileStatus {
    /// At least one reference was found.
    Resolved(DocumentReferences),
    /// The document was read but carried no references.
    Unresolved(DocumentReferences),
    /// The document could not be read.
    Failed(String),
}

/// Per-file outcome recorded in the processing log.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Path of the processed PDF.
    pub path: PathBuf,
    /// What happened to it.
    pub status: FileStatus,
}

impl FileOutcome {
    /// File name used in logs and console output.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// True when the file needs manual review.
    pub fn needs_review(&self) -> bool {
        !matches!(self.status, FileStatus::Resolved(_))
    }
}

/// References detected across a whole run, ready for reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedReferences {
    /// Distinct order numbers.
    pub orders: BTreeSet<String>,
    /// Distinct case numbers.
    pub cases: BTreeSet<String>,
    /// Invoice metadata per reference; later documents overwrite earlier ones.
    pub invoices: BTreeMap<String, InvoiceMeta>,
}

impl DetectedReferences {
    /// Fold one document's references into the run totals.
    pub fn absorb(&mut self, doc: &DocumentReferences) {
        self.orders.extend(doc.orders.iter().cloned());
        self.cases.extend(doc.cases.iter().cloned());

        if let Some(meta) = doc.invoice_meta() {
            for number in doc.orders.iter().chain(&doc.cases) {
                self.invoices.insert(number.clone(), meta.clone());
            }
        }
    }

    /// Detected numbers of the given kind.
    pub fn of_kind(&self, kind: ReferenceKind) -> &BTreeSet<String> {
        match kind {
            ReferenceKind::Order => &self.orders,
            ReferenceKind::Case => &self.cases,
        }
    }

    /// True when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.cases.is_empty()
    }

    /// Invoice metadata for a reference, if any.
    pub fn invoice_for(&self, reference: &str) -> Option<&InvoiceMeta> {
        self.invoices.get(reference)
    }
}

/// Composed result of extracting a whole folder.
#[derive(Debug, Clone, Default)]
pub struct ExtractionSummary {
    /// Outcome of each file, in processing order.
    pub outcomes: Vec<FileOutcome>,
    /// Union of all references found.
    pub detected: DetectedReferences,
}

impl ExtractionSummary {
    /// Record one file's outcome.
    pub fn record(&mut self, outcome: FileOutcome) {
        if let FileStatus::Resolved(doc) = &outcome.status {
            self.detected.absorb(doc);
        }
        self.outcomes.push(outcome);
    }

    /// Number of files that yielded at least one reference.
    pub fn resolved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.needs_review()).count()
    }

    /// Files that need manual review.
    pub fn needs_review(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.needs_review())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(folio: Option<&str>, orders: &[&str], cases: &[&str]) -> DocumentReferences {
        DocumentReferences {
            invoice_number: folio.map(str::to_string),
            emission_date: folio.map(|_| "05/03/2024".to_string()),
            orders: orders.iter().map(|s| s.to_string()).collect(),
            cases: cases.iter().map(|s| s.to_string()).collect(),
            preview: Vec::new(),
        }
    }

    #[test]
    fn test_absorb_overwrites_metadata() {
        let mut detected = DetectedReferences::default();
        detected.absorb(&doc(Some("A1"), &["5100912345"], &[]));
        detected.absorb(&doc(Some("A2"), &["5100912345"], &["12345678"]));

        assert_eq!(detected.orders.len(), 1);
        assert_eq!(detected.invoice_for("5100912345").unwrap().folio, "A2");
        assert_eq!(detected.invoice_for("12345678").unwrap().folio, "A2");
    }

    #[test]
    fn test_absorb_without_folio_keeps_previous_metadata() {
        let mut detected = DetectedReferences::default();
        detected.absorb(&doc(Some("A1"), &["5100912345"], &[]));
        detected.absorb(&doc(None, &["5100912345"], &[]));

        assert_eq!(detected.invoice_for("5100912345").unwrap().folio, "A1");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExtractionSummary::default();
        summary.record(FileOutcome {
            path: PathBuf::from("a.pdf"),
            status: FileStatus::Resolved(doc(Some("A1"), &["5100812345"], &[])),
        });
        summary.record(FileOutcome {
            path: PathBuf::from("b.pdf"),
            status: FileStatus::Unresolved(doc(None, &[], &[])),
        });
        summary.record(FileOutcome {
            path: PathBuf::from("c.pdf"),
            status: FileStatus::Failed("boom".to_string()),
        });

        assert_eq!(summary.resolved_count(), 1);
        let review: Vec<String> = summary.needs_review().map(|o| o.file_name()).collect();
        assert_eq!(review, vec!["b.pdf".to_string(), "c.pdf".to_string()]);
        assert!(summary.detected.orders.contains("5100812345"));
    }
}
