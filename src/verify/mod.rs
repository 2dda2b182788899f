//! Cross-checks precomputed `filename` values against the derivation rule.

use serde::Serialize;

use crate::core::{ReportIndex, ReportRecord};
use crate::resolve::{self, ResolveMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyStatus {
    /// `filename` equals the derived path.
    Match,
    /// `filename` disagrees with the derived path.
    Mismatch { derived: String },
    /// No `filename`; the page will use the derived path.
    DerivedOnly,
    Invalid { error: String },
}

impl VerifyStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            VerifyStatus::Mismatch { .. } | VerifyStatus::Invalid { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyEntry {
    pub date: String,
    pub href: String,
    #[serde(flatten)]
    pub status: VerifyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub checked: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub invalid: usize,
    pub entries: Vec<VerifyEntry>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.mismatched == 0 && self.invalid == 0
    }
}

pub fn verify_record(record: &ReportRecord, reference_year: i32, mode: ResolveMode) -> VerifyEntry {
    let derived = match mode {
        ResolveMode::Lenient => Ok(resolve::derived_path(record, reference_year)),
        ResolveMode::Strict => resolve::derived_path_strict(record, reference_year),
    };

    let (href, status) = match (record.precomputed_filename(), derived) {
        (Some(filename), Ok(derived)) if filename == derived => {
            (filename.to_string(), VerifyStatus::Match)
        }
        (Some(filename), Ok(derived)) => (filename.to_string(), VerifyStatus::Mismatch { derived }),
        // A precomputed filename is authoritative even when the date is unusable.
        (Some(filename), Err(err)) => (
            filename.to_string(),
            VerifyStatus::Invalid {
                error: err.to_string(),
            },
        ),
        (None, Ok(derived)) => (derived, VerifyStatus::DerivedOnly),
        (None, Err(err)) => (
            String::new(),
            VerifyStatus::Invalid {
                error: err.to_string(),
            },
        ),
    };

    VerifyEntry {
        date: record.date.clone(),
        href,
        status,
    }
}

pub fn verify_index(index: &ReportIndex, reference_year: i32, mode: ResolveMode) -> VerifyReport {
    let entries: Vec<VerifyEntry> = index
        .reports
        .iter()
        .map(|r| verify_record(r, reference_year, mode))
        .collect();

    let count = |f: fn(&VerifyStatus) -> bool| entries.iter().filter(|e| f(&e.status)).count();
    VerifyReport {
        checked: entries.len(),
        matched: count(|s| matches!(s, VerifyStatus::Match)),
        mismatched: count(|s| matches!(s, VerifyStatus::Mismatch { .. })),
        invalid: count(|s| matches!(s, VerifyStatus::Invalid { .. })),
        entries,
    }
}
