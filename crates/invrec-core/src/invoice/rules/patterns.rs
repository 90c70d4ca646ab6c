//! Common regex patterns for invoice reference extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Order numbers (pedidos): 10 digits with a fixed prefix
    pub static ref ORDER_NUMBER: Regex = Regex::new(
        r"\b(51009\d{5}|51008\d{5})\b"
    ).unwrap();

    // Case number candidates (expedientes): any standalone 8-digit token
    pub static ref CASE_CANDIDATE: Regex = Regex::new(
        r"\b\d{8}\b"
    ).unwrap();

    // Invoice identifier printed on the first page
    pub static ref FOLIO: Regex = Regex::new(
        r"Folio\s+A(\d+)"
    ).unwrap();

    // Emission timestamp printed on the first page
    pub static ref EMISSION_DATE: Regex = Regex::new(
        r"Fecha emisi[óo]n\s+(\d{4})-(\d{2})-(\d{2})\s+(\d{2}:\d{2}:\d{2})"
    ).unwrap();

    // Spreadsheet date cells written as text
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^\s*(\d{2})/(\d{2})/(\d{4})\s*$"
    ).unwrap();
}
