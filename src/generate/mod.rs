//! Synthetic `reports.json` covering the last N days, for exercising the
//! weekly page without real data.

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::core::{RecordCount, ReportIndex, ReportRecord};

const BASE_COUNT: i64 = 30;
const COUNT_STEP: i64 = 5;

/// Upper bound for `days`: one hundred years of daily reports.
pub const MAX_DAYS: u32 = 36_600;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub today: Date,
    pub days: u32,
    pub source: String,
    pub generated_at: OffsetDateTime,
}

pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("invalid date: {s} (expected YYYY-MM-DD)"))
}

/// Directory name used by the report publisher: calendar year, ISO week,
/// month and day, e.g. `2025-W39-09-24`.
pub fn week_directory(date: Date) -> String {
    format!(
        "{:04}-W{:02}-{:02}-{:02}",
        date.year(),
        date.iso_week(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn daily_record(date: Date, offset: u32) -> ReportRecord {
    let date_str = format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    );
    let path = week_directory(date);
    let filename = format!(
        "{path}/daily_{:04}{:02}{:02}.md",
        date.year(),
        u8::from(date.month()),
        date.day()
    );
    ReportRecord {
        date: date_str.clone(),
        path: Some(path),
        filename: Some(filename),
        week: Some(format!("W{:02}", date.iso_week())),
        cves_count: Some(RecordCount::Number(
            BASE_COUNT + COUNT_STEP * i64::from(offset),
        )),
        update_time: Some(date_str.clone()),
        title: Some(format!("{date_str} CVE情报速递")),
        ..ReportRecord::default()
    }
}

/// Newest first: `today`, `today - 1`, ...
pub fn generate(req: &GenerateRequest) -> Result<ReportIndex> {
    if req.days == 0 || req.days > MAX_DAYS {
        anyhow::bail!("days must be between 1 and {MAX_DAYS}: {}", req.days);
    }
    let oldest = req.days - 1;
    req.today
        .checked_sub(Duration::days(i64::from(oldest)))
        .with_context(|| format!("date out of range: {} - {oldest} days", req.today))?;

    let reports: Vec<ReportRecord> = (0..req.days)
        .filter_map(|offset| {
            req.today
                .checked_sub(Duration::days(i64::from(offset)))
                .map(|date| daily_record(date, offset))
        })
        .collect();

    let generated_at = req
        .generated_at
        .format(&Rfc3339)
        .context("failed to format generated_at")?;

    Ok(ReportIndex {
        total: Some(RecordCount::from(reports.len())),
        reports,
        generated_at: Some(generated_at),
        is_fallback: None,
        source: Some(req.source.clone()),
        is_test: Some(true),
    })
}
