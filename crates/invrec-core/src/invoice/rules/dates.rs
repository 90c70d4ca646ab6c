//! Emission date extraction and `DD/MM/YYYY` handling.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, EMISSION_DATE};
use super::{ExtractionMatch, FieldExtractor};

/// Emission date extractor.
///
/// Matches `Fecha emisión YYYY-MM-DD HH:MM:SS` and yields the date part as
/// `DD/MM/YYYY`; the time is dropped.
pub struct EmissionDateExtractor;

impl EmissionDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmissionDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmissionDateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        EMISSION_DATE
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let formatted = format!("{}/{}/{}", &caps[3], &caps[2], &caps[1]);
                Some(ExtractionMatch::new(formatted, full_match.as_str()))
            })
            .collect()
    }
}

/// Extract the emission date from first-page text as `DD/MM/YYYY`.
pub fn extract_emission_date(text: &str) -> Option<String> {
    EmissionDateExtractor::new().extract(text).map(|m| m.value)
}

/// Parse a cell value written as `DD/MM/YYYY`.
///
/// Returns `None` when the text has another shape or is not a calendar date.
pub fn parse_dmy(text: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
