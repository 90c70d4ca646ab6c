//! Marking spreadsheet rows as invoiced from detected references.

use tracing::{debug, info};

use super::workbook::fits_excel;
use super::{Cell, Result, Table};
use crate::invoice::rules::parse_dmy;
use crate::models::config::SpreadsheetConfig;
use crate::models::reference::{DetectedReferences, InvoiceMeta};

/// What reconciliation did to a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Rows matched through the order column.
    pub by_order: usize,
    /// Rows matched through the case column.
    pub by_case: usize,
    /// Rows left as they were.
    pub unchanged: usize,
    /// Date-column cells turned from text into dates.
    pub dates_converted: usize,
}

impl ReconcileStats {
    pub fn updated(&self) -> usize {
        self.by_order + self.by_case
    }
}

/// Update every row whose order or case key was detected.
///
/// The status, invoice and date columns are created when missing. An order
/// match takes precedence over a case match. Rows matching neither are not
/// touched, and the key columns are never rewritten.
pub fn reconcile(
    table: &mut Table,
    detected: &DetectedReferences,
    config: &SpreadsheetConfig,
) -> Result<ReconcileStats> {
    let order_idx = table.require_column(&config.order_column)?;
    let case_idx = table.require_column(&config.case_column)?;

    let status_idx = table.ensure_column(&config.status_column, Cell::text(config.default_status.as_str()));
    let invoice_idx = table.ensure_column(&config.invoice_column, Cell::Empty);
    let date_idx = table.ensure_column(&config.date_column, Cell::Empty);

    let mut stats = ReconcileStats::default();

    for row in 0..table.row_count() {
        let order = key_at(table, row, order_idx);
        let case = key_at(table, row, case_idx);

        let (status, reference) = if !order.is_empty() && detected.orders.contains(&order) {
            stats.by_order += 1;
            (&config.invoiced_status, order)
        } else if !case.is_empty() && detected.cases.contains(&case) {
            stats.by_case += 1;
            (&config.invoiced_by_case_status, case)
        } else {
            stats.unchanged += 1;
            continue;
        };

        table.set(row, status_idx, Cell::text(status.as_str()));

        match detected.invoice_for(&reference) {
            Some(InvoiceMeta { folio, fecha }) => {
                debug!("Row {}: {} -> invoice {} ({})", row + 2, reference, folio, fecha);
                table.set(row, invoice_idx, Cell::text(folio.as_str()));
                table.set(row, date_idx, Cell::text(fecha.as_str()));
            }
            None => debug!("Row {}: {} matched without invoice data", row + 2, reference),
        }
    }

    stats.dates_converted = convert_date_column(table, date_idx);

    info!(
        "Reconciled {} rows: {} by order, {} by case, {} unchanged",
        table.row_count(),
        stats.by_order,
        stats.by_case,
        stats.unchanged
    );
    Ok(stats)
}

/// Turn `DD/MM/YYYY` text cells of a column into dates; returns how many changed.
///
/// Cells with any other content are kept as they are. That includes impossible
/// dates and dates outside the years an `.xlsx` file can hold (1900 to 9999).
pub fn convert_date_column(table: &mut Table, col: usize) -> usize {
    let mut converted = 0;

    for row in 0..table.row_count() {
        let date = match table.cell(row, col) {
            Some(Cell::Text(text)) => parse_dmy(text).filter(|d| fits_excel(*d)),
            _ => None,
        };

        if let Some(date) = date {
            table.set(row, col, Cell::Date(date));
            converted += 1;
        }
    }

    converted
}

fn key_at(table: &Table, row: usize, col: usize) -> String {
    table.cell(row, col).map(Cell::as_key).unwrap_or_default()
}
