//! Workbook loading with calamine and in-place rewriting with rust_xlsxwriter.

use std::io::Write;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::{debug, info};

use super::{Cell, Result, Table};
use crate::error::SpreadsheetError;
use crate::models::config::SpreadsheetConfig;

/// One worksheet: its name, where its used range starts, and its content.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Zero-based (row, column) of the header cell.
    pub origin: (u32, u16),
    pub table: Table,
}

/// Every worksheet of an `.xlsx` file, held in memory.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Counts taken from a freshly written workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyStats {
    pub rows: usize,
    pub with_invoice: usize,
    pub with_date: usize,
}

impl Workbook {
    /// Read all worksheets of `path`.
    pub fn open(path: &Path) -> Result<Self> {
        check_extension(path)?;

        let mut reader: Xlsx<_> = open_workbook(path)
            .map_err(|e| SpreadsheetError::Open(format!("{}: {}", path.display(), e)))?;

        let mut sheets = Vec::new();
        for name in reader.sheet_names() {
            let range = reader
                .worksheet_range(&name)
                .map_err(|e| SpreadsheetError::Open(format!("{}: {}", name, e)))?;

            let (row, col) = range.start().unwrap_or((0, 0));
            let mut rows = range.rows();

            let headers = rows
                .next()
                .map(|r| r.iter().map(|c| cell_from_data(c).to_string()).collect())
                .unwrap_or_default();
            let data = rows.map(|r| r.iter().map(cell_from_data).collect()).collect();

            let table = Table::new(headers, data);
            debug!(
                "Sheet '{}': {} columns, {} rows",
                name,
                table.headers().len(),
                table.row_count()
            );

            sheets.push(Sheet {
                name,
                origin: (row, col as u16),
                table,
            });
        }

        if sheets.is_empty() {
            return Err(SpreadsheetError::Empty);
        }

        info!("Loaded {} worksheets from {}", sheets.len(), path.display());
        Ok(Self { sheets })
    }

    /// The named worksheet, or the first one when `name` is `None`.
    pub fn sheet_mut(&mut self, name: Option<&str>) -> Result<&mut Sheet> {
        match name {
            Some(name) => self
                .sheets
                .iter_mut()
                .find(|s| s.name == name)
                .ok_or_else(|| SpreadsheetError::MissingSheet(name.to_string())),
            None => self.sheets.first_mut().ok_or(SpreadsheetError::Empty),
        }
    }

    /// Immutable counterpart of [`Workbook::sheet_mut`].
    pub fn sheet(&self, name: Option<&str>) -> Result<&Sheet> {
        match name {
            Some(name) => self
                .sheets
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| SpreadsheetError::MissingSheet(name.to_string())),
            None => self.sheets.first().ok_or(SpreadsheetError::Empty),
        }
    }

    /// Serialize every worksheet to `.xlsx` bytes.
    pub fn to_bytes(&self, date_format: &str) -> Result<Vec<u8>> {
        let date_format = Format::new().set_num_format(date_format);
        let datetime_format = Format::new().set_num_format("dd/mm/yyyy hh:mm:ss");

        let mut workbook = XlsxWorkbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            let (row0, col0) = sheet.origin;
            for (c, header) in sheet.table.headers().iter().enumerate() {
                if !header.is_empty() {
                    worksheet.write_string(row0, col0 + c as u16, header)?;
                }
            }

            for (r, row) in sheet.table.rows().iter().enumerate() {
                let row_num = row0 + 1 + r as u32;
                for (c, cell) in row.iter().enumerate() {
                    let col_num = col0 + c as u16;
                    write_cell(worksheet, row_num, col_num, cell, &date_format, &datetime_format)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Overwrite `path` with the current content.
    ///
    /// The bytes go to a temporary file in the same directory first, which is
    /// then renamed over `path`; a failure leaves the original file intact.
    pub fn save(&self, path: &Path, date_format: &str) -> Result<()> {
        check_extension(path)?;
        let bytes = self.to_bytes(date_format)?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| SpreadsheetError::Write(e.to_string()))?;
        tmp.write_all(&bytes)
            .map_err(|e| SpreadsheetError::Write(e.to_string()))?;
        tmp.persist(path)
            .map_err(|e| SpreadsheetError::Write(e.to_string()))?;

        info!("Saved workbook to {}", path.display());
        Ok(())
    }
}

/// Re-read a saved workbook and count rows carrying an invoice number and a date.
pub fn verify_saved(path: &Path, config: &SpreadsheetConfig) -> Result<VerifyStats> {
    let workbook = Workbook::open(path)?;
    let table = &workbook.sheet(config.sheet_name.as_deref())?.table;

    let invoice_idx = table.require_column(&config.invoice_column)?;
    let date_idx = table.require_column(&config.date_column)?;

    let count = |idx: usize| table.rows().iter().filter(|r| !r[idx].is_empty()).count();

    Ok(VerifyStats {
        rows: table.row_count(),
        with_invoice: count(invoice_idx),
        with_date: count(date_idx),
    })
}

fn check_extension(path: &Path) -> Result<()> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        Ok(())
    } else {
        Err(SpreadsheetError::UnsupportedFormat(path.display().to_string()))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) => date_or_datetime(value),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso(s).unwrap_or_else(|| Cell::text(s.as_str())),
        other => Cell::text(other.to_string()),
    }
}

fn date_or_datetime(value: NaiveDateTime) -> Cell {
    if value.time() == NaiveTime::MIN {
        Cell::Date(value.date())
    } else {
        Cell::DateTime(value)
    }
}

fn parse_iso(s: &str) -> Option<Cell> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date_or_datetime(dt));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Cell::Date)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Cell::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Cell::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Cell::Date(d) => {
            let value = excel_date(*d)?;
            worksheet.write_datetime_with_format(row, col, &value, date_format)?;
        }
        Cell::DateTime(dt) => {
            let value = excel_date(dt.date())?.and_hms(
                dt.hour() as u16,
                dt.minute() as u8,
                dt.second() as f64,
            )?;
            worksheet.write_datetime_with_format(row, col, &value, datetime_format)?;
        }
    }
    Ok(())
}

/// Whether `date` falls in the year range an `.xlsx` cell can store.
pub(crate) fn fits_excel(date: NaiveDate) -> bool {
    (1900..=9999).contains(&date.year())
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .map_err(|_| SpreadsheetError::Write(format!("date out of range: {}", date)))?;
    Ok(ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?)
}
