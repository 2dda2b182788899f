//! Report link derivation: `{dir}/daily_{YYYYMMDD}.md`.
//!
//! Dates come in three encodings: `YYYY-MM-DD`, `MM-DD` (year taken from the
//! caller-supplied reference year) and `YYYYMMDD`. The lenient functions never
//! fail and pass malformed dates through; the strict ones reject them.

use std::fmt;

use time::OffsetDateTime;

use crate::core::ReportRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    #[default]
    Lenient,
    Strict,
}

impl ResolveMode {
    pub const fn from_strict(strict: bool) -> Self {
        if strict {
            ResolveMode::Strict
        } else {
            ResolveMode::Lenient
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    MissingDate,
    InvalidDateFormat { date: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::MissingDate => f.write_str("report has neither a date nor a filename"),
            ResolveError::InvalidDateFormat { date } => write!(
                f,
                "invalid report date: {date:?} (expected YYYY-MM-DD, MM-DD or YYYYMMDD)"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn current_year() -> i32 {
    local_now().year()
}

/// Normalizes `date` to `YYYYMMDD`. Unrecognized shapes are returned as-is.
pub fn normalize_date(date: &str, reference_year: i32) -> String {
    if !date.contains('-') {
        return date.to_string();
    }
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [y, m, d] => format!("{y}{m}{d}"),
        [m, d] => format!("{reference_year:04}{m}{d}"),
        _ => date.to_string(),
    }
}

pub fn normalize_date_strict(date: &str, reference_year: i32) -> Result<String, ResolveError> {
    if date.is_empty() {
        return Err(ResolveError::MissingDate);
    }
    if date.contains('-') {
        let segments = date.split('-').count();
        if segments != 2 && segments != 3 {
            return Err(invalid(date));
        }
        return Ok(normalize_date(date, reference_year));
    }
    if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
        Ok(date.to_string())
    } else {
        Err(invalid(date))
    }
}

/// Relative link of the record's markdown file. A non-empty `filename` wins;
/// otherwise the link is derived from `path` (or the raw `date`) and the
/// normalized date.
pub fn resolve(record: &ReportRecord, reference_year: i32) -> String {
    if let Some(filename) = record.precomputed_filename() {
        return filename.to_string();
    }
    derived_path(record, reference_year)
}

pub fn resolve_strict(record: &ReportRecord, reference_year: i32) -> Result<String, ResolveError> {
    if let Some(filename) = record.precomputed_filename() {
        return Ok(filename.to_string());
    }
    derived_path_strict(record, reference_year)
}

pub fn resolve_with_mode(
    record: &ReportRecord,
    reference_year: i32,
    mode: ResolveMode,
) -> Result<String, ResolveError> {
    match mode {
        ResolveMode::Lenient => Ok(resolve(record, reference_year)),
        ResolveMode::Strict => resolve_strict(record, reference_year),
    }
}

/// The path the derivation rule produces, ignoring any precomputed
/// `filename`.
pub fn derived_path(record: &ReportRecord, reference_year: i32) -> String {
    join(
        record.directory_segment(),
        &normalize_date(&record.date, reference_year),
    )
}

pub fn derived_path_strict(
    record: &ReportRecord,
    reference_year: i32,
) -> Result<String, ResolveError> {
    let date = normalize_date_strict(&record.date, reference_year)?;
    Ok(join(record.directory_segment(), &date))
}

fn join(directory: &str, normalized_date: &str) -> String {
    format!("{directory}/daily_{normalized_date}.md")
}

fn invalid(date: &str) -> ResolveError {
    ResolveError::InvalidDateFormat {
        date: date.to_string(),
    }
}
