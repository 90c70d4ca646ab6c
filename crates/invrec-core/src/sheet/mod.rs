//! Spreadsheet model, workbook I/O and reconciliation.

mod reconcile;
mod workbook;

pub use reconcile::{convert_date_column, reconcile, ReconcileStats};
pub use workbook::{verify_saved, Sheet, VerifyStats, Workbook};

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SpreadsheetError;

/// Result type for spreadsheet operations.
pub type Result<T> = std::result::Result<T, SpreadsheetError>;

/// A typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Text cell, or empty when `value` is empty.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// Trimmed string form used to compare reference keys.
    ///
    /// Whole numbers print without a fractional part so that `5100912345`
    /// stored as a number matches the extracted token.
    pub fn as_key(&self) -> String {
        self.to_string().trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%d/%m/%Y %H:%M:%S")),
        }
    }
}

/// Header row plus data rows of one worksheet.
///
/// Every row is kept exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding or widening rows to a rectangular shape.
    pub fn new(mut headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(headers.len());

        headers.resize(width, String::new());

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column whose header equals `name` (surrounding spaces ignored).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SpreadsheetError::MissingColumn(name.to_string()))
    }

    /// Index of `name`, appending it filled with `default` when absent.
    ///
    /// Existing columns are returned untouched.
    pub fn ensure_column(&mut self, name: &str, default: Cell) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }

        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.clone());
        }
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = value;
        }
    }
}
