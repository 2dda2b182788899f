use serde::{Deserialize, Serialize};

use crate::core::{RecordCount, ReportRecord};

/// Top-level shape of `reports.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportIndex {
    #[serde(default)]
    pub reports: Vec<ReportRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<RecordCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_test: Option<bool>,
}

impl ReportIndex {
    /// `total` as declared by the generator, or the record count when it is
    /// missing or not a usable count.
    pub fn declared_total(&self) -> usize {
        self.total
            .as_ref()
            .and_then(RecordCount::as_len)
            .unwrap_or(self.reports.len())
    }
}
