use crate::core::ReportRecord;
use crate::resolve::{self, ResolveMode};

/// Display line under a report link, e.g. `Week 38 - 最新 | 📈 1,234条记录 | ⏰ 2025-09-24 11:45:27`.
pub fn card_meta(record: &ReportRecord, is_latest: bool) -> String {
    let mut out = String::from("Week ");
    match record.week.as_deref() {
        Some(week) if !week.is_empty() => out.push_str(&week.replacen('W', "", 1)),
        _ => out.push('?'),
    }
    if is_latest {
        out.push_str(" - 最新");
    }
    if let Some(count) = record.cves_count.as_ref().filter(|c| !c.is_blank()) {
        out.push_str(&format!(" | 📈 {count}条记录"));
    }
    if let Some(update_time) = record.update_time.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!(" | ⏰ {update_time}"));
    }
    out
}

/// HTML card linking to one daily report. Links are always resolved
/// leniently so that a page can render every record it was given.
pub fn render_card(record: &ReportRecord, reference_year: i32, is_latest: bool) -> String {
    let href = resolve::resolve(record, reference_year);
    [
        format!("<a href=\"{}\">", escape_html(&href)),
        format!("  📈 {} 每日报告", escape_html(&record.date)),
        "</a>".to_string(),
        "<div class=\"report-date\">".to_string(),
        format!("  {}</div>", escape_html(&card_meta(record, is_latest))),
    ]
    .join("\n")
}

/// Cards for a whole list; the first record is the latest one. Records that
/// do not resolve under `mode` get no card.
pub fn render_cards(records: &[ReportRecord], reference_year: i32, mode: ResolveMode) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if resolve::resolve_with_mode(record, reference_year, mode).is_err() {
            continue;
        }
        out.push_str(&render_card(record, reference_year, i == 0));
        out.push('\n');
    }
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
