use anyhow::Error;
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::render::{LinkOrigin, ResolvedLink};
use crate::verify::{VerifyReport, VerifyStatus};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub quiet: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(
        stderr,
        "  - see `weekly-links --help` for available commands and options"
    );
}

pub fn print_links(links: &[ResolvedLink], cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    write_links_table(&mut out, links, cfg.color);
}

pub fn print_verify(report: &VerifyReport, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    for entry in &report.entries {
        let label = status_label(&entry.status, cfg.color);
        let date = if entry.date.is_empty() {
            "(no date)"
        } else {
            entry.date.as_str()
        };
        match &entry.status {
            VerifyStatus::Match | VerifyStatus::DerivedOnly => {
                let _ = writeln!(out, "{label}  {date}  {}", entry.href);
            }
            VerifyStatus::Mismatch { derived } => {
                let _ = writeln!(out, "{label}  {date}  {}", entry.href);
                let _ = writeln!(out, "      derived: {derived}");
            }
            VerifyStatus::Invalid { error } => {
                let _ = writeln!(out, "{label}  {date}  {error}");
            }
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "checked={} matched={} mismatched={} invalid={}",
        report.checked, report.matched, report.mismatched, report.invalid
    );
}

fn write_links_table(out: &mut dyn Write, links: &[ResolvedLink], color: bool) {
    let label_date = "DATE";
    let label_week = "WEEK";
    let label_origin = "FROM";
    let label_link = "LINK";

    let date_w = links
        .iter()
        .map(|l| visible_width_ansi(&l.date))
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi(label_date));
    let week_w = links
        .iter()
        .map(|l| visible_width_ansi(l.week.as_deref().unwrap_or("-")))
        .max()
        .unwrap_or(0)
        .max(visible_width_ansi(label_week));
    let origin_w = visible_width_ansi("filename");

    let _ = writeln!(
        out,
        "{}  {}  {}  {}",
        pad_end_display(label_date, date_w),
        pad_end_display(label_week, week_w),
        pad_end_display(label_origin, origin_w),
        label_link
    );
    let _ = writeln!(
        out,
        "{}  {}  {}  {}",
        "-".repeat(date_w),
        "-".repeat(week_w),
        "-".repeat(origin_w),
        "-".repeat(label_link.len())
    );

    for link in links {
        let date = pad_end_display(&link.date, date_w);
        let week = pad_end_display(link.week.as_deref().unwrap_or("-"), week_w);
        let origin = pad_end_display(origin_label(link.origin), origin_w);
        let target = match (&link.href, &link.error) {
            (Some(href), _) => href.clone(),
            (None, Some(error)) => paint(&format!("error: {error}"), "31", color),
            (None, None) => String::new(),
        };
        let _ = writeln!(out, "{date}  {week}  {origin}  {target}");
    }
}

fn origin_label(origin: LinkOrigin) -> &'static str {
    match origin {
        LinkOrigin::Filename => "filename",
        LinkOrigin::Derived => "derived",
    }
}

fn status_label(status: &VerifyStatus, color: bool) -> String {
    let (s, code) = match status {
        VerifyStatus::Match => ("ok  ", "32"),
        VerifyStatus::DerivedOnly => ("--  ", "90"),
        VerifyStatus::Mismatch { .. } => ("DIFF", "33"),
        VerifyStatus::Invalid { .. } => ("BAD ", "31"),
    };
    paint(s, code, color)
}

fn paint(s: &str, code: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}
