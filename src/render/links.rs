use serde::Serialize;

use crate::core::{ReportIndex, ReportRecord};
use crate::resolve::{self, ResolveMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOrigin {
    Filename,
    Derived,
}

/// One record of an index together with its resolved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub origin: LinkOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolvedLink {
    pub fn from_record(record: &ReportRecord, reference_year: i32, mode: ResolveMode) -> Self {
        let origin = if record.precomputed_filename().is_some() {
            LinkOrigin::Filename
        } else {
            LinkOrigin::Derived
        };
        let (href, error) = match resolve::resolve_with_mode(record, reference_year, mode) {
            Ok(href) => (Some(href), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            date: record.date.clone(),
            week: record.week.clone(),
            href,
            origin,
            error,
        }
    }
}

/// Resolves every record, preserving index order.
pub fn resolve_all(index: &ReportIndex, reference_year: i32, mode: ResolveMode) -> Vec<ResolvedLink> {
    index
        .reports
        .iter()
        .map(|r| ResolvedLink::from_record(r, reference_year, mode))
        .collect()
}
