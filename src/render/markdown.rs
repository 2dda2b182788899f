use crate::core::ReportIndex;
use crate::render::card_meta;
use crate::resolve::{self, ResolveMode};

/// Records that do not resolve under `mode` are left out of the list.
pub fn format_markdown_index(
    index: &ReportIndex,
    reference_year: i32,
    mode: ResolveMode,
) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();

    let _ = writeln!(out, "# CVE 每日报告");
    let _ = writeln!(out);
    let _ = writeln!(out, "- 报告数: {}", index.declared_total());
    if let Some(generated_at) = &index.generated_at {
        let _ = writeln!(out, "- 生成时间: {generated_at}");
    }
    if let Some(source) = &index.source {
        let _ = writeln!(out, "- 数据来源: {source}");
    }
    if index.is_fallback == Some(true) {
        let _ = writeln!(out, "- 注意: 当前为备用数据");
    }

    let _ = writeln!(out);
    if index.reports.is_empty() {
        let _ = writeln!(out, "_暂无报告。_");
    }
    for (i, record) in index.reports.iter().enumerate() {
        let Ok(href) = resolve::resolve_with_mode(record, reference_year, mode) else {
            continue;
        };
        let label = record
            .title
            .clone()
            .unwrap_or_else(|| format!("{} 每日报告", record.date));
        let _ = writeln!(
            out,
            "- [{}]({}) {}",
            escape_link_text(&label),
            href.replace(' ', "%20"),
            card_meta(record, i == 0)
        );
    }

    out
}

fn escape_link_text(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}
