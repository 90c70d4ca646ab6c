//! Folder-level extraction: one pure call per PDF, composed by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::models::config::ExtractionConfig;
use crate::models::reference::{DocumentReferences, ExtractionSummary, FileOutcome, FileStatus};
use crate::pdf::{PdfExtractor, PdfProcessor};

use super::parser::{InvoiceParser, ReferenceParser};

/// List the `.pdf` files of a folder (extension compared case-insensitively), sorted by name.
pub fn list_pdf_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ExtractionError::NotADirectory(folder.display().to_string()).into());
    }

    let entries = fs::read_dir(folder).map_err(|source| ExtractionError::ReadDir {
        path: folder.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    debug!("Found {} PDF files in {}", files.len(), folder.display());
    Ok(files)
}

/// Read one PDF and extract its references.
pub fn extract_document(path: &Path, parser: &impl InvoiceParser) -> Result<DocumentReferences> {
    let data = fs::read(path)?;

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let pages = extractor.extract_pages()?;
    Ok(parser.parse(&pages))
}

/// Progress notifications from [`BatchExtractor::extract_folder_with`].
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// The folder was listed.
    Started { total: usize },
    /// A file is about to be read.
    Processing(&'a Path),
    /// A file was processed.
    Finished(&'a FileOutcome),
}

/// Extracts every PDF of a folder, one file at a time.
pub struct BatchExtractor<P = ReferenceParser> {
    parser: P,
}

impl BatchExtractor<ReferenceParser> {
    /// Create a batch extractor from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(ReferenceParser::from_config(config))
    }
}

impl<P: InvoiceParser> BatchExtractor<P> {
    /// Create a batch extractor around a parser.
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Process one file; failures become a [`FileStatus::Failed`] outcome.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let status = match extract_document(path, &self.parser) {
            Ok(doc) if doc.has_references() => {
                info!(
                    "{}: {} orders, {} cases, invoice {}",
                    path.display(),
                    doc.orders.len(),
                    doc.cases.len(),
                    doc.invoice_number.as_deref().unwrap_or("-")
                );
                FileStatus::Resolved(doc)
            }
            Ok(doc) => {
                warn!("{}: no references found", path.display());
                FileStatus::Unresolved(doc)
            }
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                FileStatus::Failed(e.to_string())
            }
        };

        FileOutcome {
            path: path.to_path_buf(),
            status,
        }
    }

    /// Process every PDF of `folder` and compose the results.
    pub fn extract_folder(&self, folder: &Path) -> Result<ExtractionSummary> {
        self.extract_folder_with(folder, |_| {})
    }

    /// [`BatchExtractor::extract_folder`], reporting each step to `on_event`.
    pub fn extract_folder_with<F>(&self, folder: &Path, mut on_event: F) -> Result<ExtractionSummary>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let files = list_pdf_files(folder)?;
        on_event(BatchEvent::Started { total: files.len() });

        let mut summary = ExtractionSummary::default();
        for path in &files {
            on_event(BatchEvent::Processing(path));
            let outcome = self.process_file(path);
            on_event(BatchEvent::Finished(&outcome));
            summary.record(outcome);
        }
        Ok(summary)
    }
}

/// Extract every PDF of `folder` with the given configuration.
pub fn extract_folder(folder: &Path, config: &ExtractionConfig) -> Result<ExtractionSummary> {
    BatchExtractor::<ReferenceParser>::from_config(config).extract_folder(folder)
}
