use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

fn weekly_links_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_weekly-links"));
    cmd.env("HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("WEEKLY_LINKS_CONFIG");
    cmd.env_remove("WEEKLY_LINKS_UI_COLOR");
    cmd.env_remove("WEEKLY_LINKS_RESOLVE_STRICT");
    cmd.env_remove("WEEKLY_LINKS_RESOLVE_REFERENCE_YEAR");
    cmd.env_remove("WEEKLY_LINKS_GENERATE_DAYS");
    cmd.env_remove("WEEKLY_LINKS_GENERATE_SOURCE");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    weekly_links_cmd(home)
        .args(args)
        .output()
        .expect("run weekly-links")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home = std::env::temp_dir().join(format!(
        "weekly-links-index-test-{}-{seq}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn links_json_resolves_every_record_in_order() {
    let home = make_temp_home();
    let index = fixture("reports_mixed.json");
    let out = run(&home, &["--year", "2025", "links", "--json", &index]);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let hrefs: Vec<&str> = v
        .as_array()
        .expect("array")
        .iter()
        .map(|l| l["href"].as_str().expect("href"))
        .collect();
    assert_eq!(
        hrefs,
        vec![
            "2025-W38-09-24/daily_20250924.md",
            "09-23/daily_20250923.md",
            "R1/daily_20250922.md",
        ]
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn links_table_lists_origin() {
    let home = make_temp_home();
    let index = fixture("reports.json");
    let out = run(&home, &["links", &index]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("DATE"), "stdout={stdout}");
    assert_eq!(stdout.matches("filename").count(), 3, "stdout={stdout}");
    assert!(
        stdout.contains("2025-W38-09-22/daily_20250922.md"),
        "stdout={stdout}"
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn links_reads_index_from_stdin() {
    let home = make_temp_home();
    let body = std::fs::read(fixture("reports.json")).expect("read fixture");

    let mut child = weekly_links_cmd(&home)
        .args(["links", "--json", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn weekly-links");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&body)
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");

    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v.as_array().map(Vec::len), Some(3));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn links_markdown_marks_latest() {
    let home = make_temp_home();
    let index = fixture("reports_mixed.json");
    let out = run(&home, &["--year", "2025", "links", "--markdown", &index]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains(
            "- [2025-09-24 每日报告](2025-W38-09-24/daily_20250924.md) Week 38 - 最新 | 📈 1,234条记录 | ⏰ 2025-09-24 11:45:27"
        ),
        "stdout={stdout}"
    );
    assert_eq!(stdout.matches("最新").count(), 1, "stdout={stdout}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn strict_links_fail_with_exit_10_on_malformed_dates() {
    let home = make_temp_home();
    let index = fixture("reports_malformed_dates.json");

    let lenient = run(&home, &["links", "--json", &index]);
    assert!(lenient.status.success());

    let strict = run(&home, &["--strict", "links", "--json", &index]);
    assert_eq!(strict.status.code(), Some(10));
    let v: serde_json::Value = serde_json::from_slice(&strict.stdout).expect("parse json");
    assert!(v[1]["error"].as_str().is_some_and(|e| e.contains("24/09/2025")));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn html_renders_one_card_per_record() {
    let home = make_temp_home();
    let index = fixture("reports.json");
    let out = run(&home, &["html", &index]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with(
            "<a href=\"2025-W38-09-24/daily_20250924.md\">\n  📈 2025-09-24 每日报告\n</a>\n<div class=\"report-date\">\n  Week 38 - 最新 | 📈 50条记录</div>\n"
        ),
        "stdout={stdout}"
    );
    assert_eq!(stdout.matches("<div class=\"report-date\">").count(), 3);
    assert!(stdout.contains("  Week 38 | 📈 38条记录</div>"), "stdout={stdout}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn strict_html_prints_resolvable_cards_then_exits_10() {
    let home = make_temp_home();
    let index = fixture("reports_malformed_dates.json");
    let out = run(&home, &["--strict", "html", &index]);
    assert_eq!(out.status.code(), Some(10));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with("<a href=\"2025-W38-09-24/daily_20250924.md\">"),
        "stdout={stdout}"
    );
    assert_eq!(stdout.matches("<a href=").count(), 1, "stdout={stdout}");
    assert!(!stdout.contains("R2/"), "stdout={stdout}");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("1 of 2 records"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn float_and_negative_counts_do_not_reject_the_index() {
    let home = make_temp_home();
    let index = fixture("reports_odd_counts.json");

    let out = run(&home, &["links", "--json", &index]);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v[0]["href"], "2025-W38-09-24/daily_20250924.md");
    assert_eq!(v[1]["href"], "2025-W38-09-23/daily_20250923.md");

    let html = run(&home, &["html", &index]);
    assert!(html.status.success());
    let stdout = String::from_utf8_lossy(&html.stdout);
    assert!(stdout.contains("Week 38 - 最新 | 📈 45条记录"), "stdout={stdout}");
    assert!(stdout.contains("Week 38 | 📈 -1条记录"), "stdout={stdout}");

    let md = run(&home, &["links", "--markdown", &index]);
    assert!(md.status.success());
    assert!(String::from_utf8_lossy(&md.stdout).contains("- 报告数: 2"));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn html_rejects_json_flag() {
    let home = make_temp_home();
    let index = fixture("reports.json");
    let out = run(&home, &["html", "--json", &index]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn verify_passes_for_consistent_index() {
    let home = make_temp_home();
    let index = fixture("reports.json");
    let out = run(&home, &["verify", &index]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("checked=3 matched=3 mismatched=0 invalid=0"),
        "stdout={stdout}"
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn verify_reports_mismatch_with_exit_1() {
    let home = make_temp_home();
    let index = fixture("reports_mismatch.json");
    let out = run(&home, &["verify", "--json", &index]);
    assert_eq!(out.status.code(), Some(1));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v["mismatched"], 1);
    assert_eq!(v["entries"][0]["status"], "match");
    assert_eq!(v["entries"][1]["status"], "mismatch");
    assert_eq!(
        v["entries"][1]["derived"],
        "2025-W38-09-23/daily_20250923.md"
    );
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn missing_index_file_exits_10() {
    let home = make_temp_home();
    let missing = home.join("nope.json");
    let out = run(&home, &["links", &missing.display().to_string()]);
    assert_eq!(out.status.code(), Some(10));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read report index"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn malformed_index_exits_10() {
    let home = make_temp_home();
    let path = home.join("reports.json");
    std::fs::write(&path, b"{\"reports\": [").expect("write");
    let out = run(&home, &["verify", &path.display().to_string()]);
    assert_eq!(out.status.code(), Some(10));
    let _ = std::fs::remove_dir_all(&home);
}
