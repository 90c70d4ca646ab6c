//! Configuration structures for the extraction and reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::InvrecError;

/// Main configuration for the invrec pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvrecConfig {
    /// Reference extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spreadsheet column and status configuration.
    pub spreadsheet: SpreadsheetConfig,
}

/// Reference extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keywords that validate an 8-digit token as a case number.
    pub case_keywords: Vec<String>,

    /// Keywords that validate an order number when `require_order_context` is set.
    pub order_keywords: Vec<String>,

    /// 8-digit tokens that are never case numbers.
    pub excluded_case_numbers: Vec<String>,

    /// Characters scanned on each side of a candidate for keywords.
    pub context_window: usize,

    /// Lines of text written to the log for unresolved documents.
    pub preview_lines: usize,

    /// Apply keyword validation to order numbers as well.
    ///
    /// Off by default: order numbers are accepted on prefix alone.
    pub require_order_context: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            case_keywords: to_strings(&[
                "EXPEDIENTE", "ARRASTRE", "GRUA", "EXP", "EXPTE", "SINIESTRO", "SERVICIO",
                "NUM", "NUMERO", "NO", "Nº",
            ]),
            order_keywords: to_strings(&[
                "PEDIDO", "ORDEN", "COMPRA", "SERVICIO", "REFERENCIA", "PED", "OC", "O C",
                "NUM", "NUMERO", "NO", "Nº", "REALIZADO", "SERVICIO REALIZADO", "MUERTO",
                "ARRASTRE", "GRUA", "FACTURA", "REMISION",
            ]),
            excluded_case_numbers: to_strings(&["78101803"]),
            context_window: 30,
            preview_lines: 10,
            require_order_context: false,
        }
    }
}

/// Spreadsheet layout and status labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// Worksheet to reconcile (first sheet when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,

    /// Column holding order numbers.
    pub order_column: String,

    /// Column holding case numbers.
    pub case_column: String,

    /// Billing status column.
    pub status_column: String,

    /// Invoice number column.
    pub invoice_column: String,

    /// Emission date column.
    pub date_column: String,

    /// Status given to rows when the status column is created.
    pub default_status: String,

    /// Status for rows matched by order number.
    pub invoiced_status: String,

    /// Status for rows matched by case number.
    pub invoiced_by_case_status: String,

    /// Excel number format applied to emission dates.
    pub date_format: String,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            sheet_name: None,
            order_column: "Numero de Pedido".to_string(),
            case_column: "Nº de pieza".to_string(),
            status_column: "Status".to_string(),
            invoice_column: "No factura".to_string(),
            date_column: "Fecha emisión".to_string(),
            default_status: "NO FACTURADO".to_string(),
            invoiced_status: "FACTURADO".to_string(),
            invoiced_by_case_status: "FACTURADO POR EXPEDIENTE".to_string(),
            date_format: "dd/mm/yyyy".to_string(),
        }
    }
}

impl InvrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, InvrecError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| InvrecError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), InvrecError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvrecError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the extractor cannot work with.
    pub fn validate(&self) -> Result<(), InvrecError> {
        if self.extraction.case_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(InvrecError::Config(
                "extraction.case_keywords must not contain empty keywords".to_string(),
            ));
        }
        if self.extraction.order_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(InvrecError::Config(
                "extraction.order_keywords must not contain empty keywords".to_string(),
            ));
        }

        let sheet = &self.spreadsheet;
        let columns = [
            &sheet.order_column,
            &sheet.case_column,
            &sheet.status_column,
            &sheet.invoice_column,
            &sheet.date_column,
        ];
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(InvrecError::Config(
                "spreadsheet column names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
