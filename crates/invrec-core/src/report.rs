//! Processing log written after a folder has been extracted.
//!
//! The log is read by the people who reconcile invoices by hand, so its
//! wording and layout stay in Spanish.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::reference::{DetectedReferences, ExtractionSummary, FileStatus, ReferenceKind};

const SEPARATOR_WIDTH: usize = 50;

/// Write the processing log for `summary`.
pub fn write_report<W: Write>(out: &mut W, summary: &ExtractionSummary) -> io::Result<()> {
    writeln!(out, "=== REPORTE DE PROCESAMIENTO DE FACTURAS ===")?;
    writeln!(out)?;
    writeln!(out, "1. ARCHIVOS SIN REFERENCIAS ENCONTRADAS")?;
    writeln!(out, "==========================================")?;

    for outcome in &summary.outcomes {
        match &outcome.status {
            FileStatus::Resolved(_) => continue,
            FileStatus::Unresolved(doc) => {
                writeln!(out, "\n=== {} ===", outcome.file_name())?;
                writeln!(out, "Primeras {} líneas del contenido:", doc.preview.len())?;
                for line in &doc.preview {
                    writeln!(out, "{}", line)?;
                }
            }
            FileStatus::Failed(error) => {
                writeln!(out, "\n=== {} ===", outcome.file_name())?;
                writeln!(out, "Error al procesar el archivo: {}", error)?;
            }
        }
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    }

    writeln!(out, "\n\n2. ARCHIVOS PROCESADOS")?;
    writeln!(out, "==========================================")?;
    for outcome in &summary.outcomes {
        let line = match &outcome.status {
            FileStatus::Resolved(doc) => format!(
                "OK - {} pedidos, {} expedientes, factura {}",
                doc.orders.len(),
                doc.cases.len(),
                doc.invoice_number.as_deref().unwrap_or("N/A")
            ),
            FileStatus::Unresolved(_) => "SIN REFERENCIAS".to_string(),
            FileStatus::Failed(_) => "ERROR".to_string(),
        };
        writeln!(out, "- {}: {}", outcome.file_name(), line)?;
    }

    writeln!(out, "\n\n=== RESUMEN ===")?;
    writeln!(out, "Total de PDFs encontrados: {}", summary.outcomes.len())?;
    writeln!(out, "PDFs procesados exitosamente: {}", summary.resolved_count())?;
    writeln!(out, "PDFs sin referencias encontradas: {}", summary.needs_review().count())?;
    writeln!(out, "\nLista de archivos a revisar:")?;
    for outcome in summary.needs_review() {
        writeln!(out, "- {}", outcome.file_name())?;
    }

    let detected = &summary.detected;
    for kind in [ReferenceKind::Order, ReferenceKind::Case] {
        let numbers = detected.of_kind(kind);
        if numbers.is_empty() {
            continue;
        }

        let title = match kind {
            ReferenceKind::Order => "Números de pedido detectados:",
            ReferenceKind::Case => "Números de expediente detectados:",
        };
        writeln!(out, "\n{}", title)?;
        write_references(out, numbers, detected)?;
    }

    Ok(())
}

fn write_references<W: Write>(
    out: &mut W,
    numbers: &BTreeSet<String>,
    detected: &DetectedReferences,
) -> io::Result<()> {
    for number in numbers {
        let (folio, fecha) = match detected.invoice_for(number) {
            Some(meta) => (meta.folio.as_str(), meta.fecha.as_str()),
            None => ("N/A", "N/A"),
        };
        writeln!(out, "- {}: Factura {}, Fecha {}", number, folio, fecha)?;
    }
    Ok(())
}

/// Write the processing log to `path`, creating its parent directory.
pub fn write_report_file(path: &Path, summary: &ExtractionSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, summary)?;
    out.flush()?;

    info!("Processing log written to {}", path.display());
    Ok(())
}
