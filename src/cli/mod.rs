use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

use crate::core::ReportRecord;
use crate::generate::GenerateRequest;
use crate::index::IndexSource;
use crate::render::ResolvedLink;
use crate::resolve::ResolveMode;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "weekly-links",
    version,
    about = "Resolve, render and verify daily report links from a weekly CVE report index (reports.json)"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Year used for `MM-DD` dates (defaults to the current year)
    #[arg(long, global = true)]
    pub year: Option<i32>,
    /// Reject malformed dates instead of passing them through
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the link of a single report record
    Resolve(ResolveArgs),
    /// Resolve the link of every record in an index
    Links(LinksArgs),
    /// Print the HTML link card of every record in an index
    Html(IndexArgs),
    /// Check precomputed filenames against the derived links
    Verify(IndexArgs),
    /// Generate a test index for the last N days
    Generate(GenerateArgs),
    /// Print shell completions (bash, zsh or fish)
    Completion(CompletionArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[arg(long, default_value = "")]
    pub date: String,
    #[arg(long)]
    pub path: Option<String>,
    #[arg(long)]
    pub filename: Option<String>,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Path to reports.json (`-` or omitted reads stdin)
    pub index: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    pub index: Option<PathBuf>,
    #[arg(long)]
    pub markdown: bool,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub days: Option<u32>,
    /// Newest report date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub today: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = crate::config::effective_home_dir().map_err(crate::exit::invalid_args_err)?;

    let env_config_path = std::env::var_os("WEEKLY_LINKS_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty
        && cfg.ui.color
        && !cli.no_color
        && std::env::var_os("NO_COLOR").is_none();

    let ui_cfg = UiConfig {
        color,
        quiet: cli.quiet,
    };

    if let Some(year) = cli.year {
        if !(0..=9999).contains(&year) {
            return Err(crate::exit::invalid_args(format!(
                "--year must be a 4-digit year: {year}"
            )));
        }
    }
    let reference_year = cli
        .year
        .or(cfg.resolve.reference_year)
        .unwrap_or_else(crate::resolve::current_year);
    let mode = ResolveMode::from_strict(cli.strict || cfg.resolve.strict);

    match cli.command {
        Commands::Resolve(args) => {
            let record = ReportRecord {
                path: args.path,
                filename: args.filename,
                ..ReportRecord::new(args.date)
            };
            let link = ResolvedLink::from_record(&record, reference_year, mode);
            if let Some(error) = &link.error {
                return Err(crate::exit::invalid_args(format!("resolve: {error}")));
            }
            if cli.json {
                write_json(&link)?;
            } else if let Some(href) = &link.href {
                write_stdout(&format!("{href}\n"))?;
            }
        }
        Commands::Links(args) => {
            let index = load_index(args.index.as_deref())?;
            let links = crate::render::resolve_all(&index, reference_year, mode);
            if cli.json {
                write_json(&links)?;
            } else if args.markdown {
                write_stdout(&crate::render::format_markdown_index(
                    &index,
                    reference_year,
                    mode,
                ))?;
            } else {
                crate::ui::print_links(&links, &ui_cfg);
            }
            ensure_resolved(&links)?;
        }
        Commands::Html(args) => {
            if cli.json {
                return Err(crate::exit::invalid_args(
                    "html cannot be combined with --json",
                ));
            }
            let index = load_index(args.index.as_deref())?;
            write_stdout(&crate::render::render_cards(
                &index.reports,
                reference_year,
                mode,
            ))?;
            ensure_resolved(&crate::render::resolve_all(
                &index,
                reference_year,
                mode,
            ))?;
        }
        Commands::Verify(args) => {
            let index = load_index(args.index.as_deref())?;
            let report = crate::verify::verify_index(&index, reference_year, mode);
            if cli.json {
                write_json(&report)?;
            } else {
                crate::ui::print_verify(&report, &ui_cfg);
            }
            if !report.passed() {
                return Err(crate::exit::verify_failed(format!(
                    "verify: {} mismatched, {} invalid of {} records",
                    report.mismatched, report.invalid, report.checked
                )));
            }
        }
        Commands::Generate(args) => {
            let days = args.days.unwrap_or(cfg.generate.days);
            let max_days = crate::generate::MAX_DAYS;
            if !(1..=max_days).contains(&days) {
                return Err(crate::exit::invalid_args(format!(
                    "generate: --days must be between 1 and {max_days}: {days}"
                )));
            }
            let now = crate::resolve::local_now();
            let today = match args.today.as_deref() {
                Some(s) => crate::generate::parse_date(s).map_err(crate::exit::invalid_args_err)?,
                None => now.date(),
            };
            let index = crate::generate::generate(&GenerateRequest {
                today,
                days,
                source: args.source.unwrap_or_else(|| cfg.generate.source.clone()),
                generated_at: now,
            })
            .map_err(crate::exit::invalid_args_err)?;

            match args.output {
                Some(path) => {
                    write_index_file(&path, &index).map_err(crate::exit::write_failed_err)?;
                    if !ui_cfg.quiet {
                        eprintln!(
                            "generate: wrote {} reports to {}",
                            index.reports.len(),
                            path.display()
                        );
                    }
                }
                None => write_json(&index)?,
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "weekly-links", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    write_json(&cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `weekly-links config --show`");
            }
        }
    }

    Ok(())
}

fn load_index(arg: Option<&Path>) -> Result<crate::core::ReportIndex> {
    crate::index::load(IndexSource::from_arg(arg)).map_err(crate::exit::load_failed_err)
}

fn ensure_resolved(links: &[ResolvedLink]) -> Result<()> {
    let failed = links.iter().filter(|l| l.error.is_some()).count();
    if failed == 0 {
        return Ok(());
    }
    Err(crate::exit::load_failed_err(anyhow::anyhow!(
        "{failed} of {} records could not be resolved",
        links.len()
    )))
}

fn write_index_file(path: &Path, index: &crate::core::ReportIndex) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let mut buf = serde_json::to_vec_pretty(index)?;
    buf.push(b'\n');
    std::fs::write(path, buf).with_context(|| format!("failed to write: {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(value)?;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn write_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(text.as_bytes()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (use bash|zsh|fish)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LinkOrigin;

    fn link(error: Option<&str>) -> ResolvedLink {
        ResolvedLink {
            date: "d".to_string(),
            week: None,
            href: error.is_none().then(|| "d/daily_d.md".to_string()),
            origin: LinkOrigin::Derived,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn ensure_resolved_counts_failures() {
        assert!(ensure_resolved(&[link(None), link(None)]).is_ok());
        let err = ensure_resolved(&[link(None), link(Some("bad"))]).unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 10);
        assert!(err.to_string().contains("1 of 2"), "{err}");
    }

    #[test]
    fn parse_shell_rejects_unknown() {
        assert!(parse_shell("Bash").is_ok());
        let err = parse_shell("nope").unwrap_err();
        assert_eq!(crate::exit::exit_code(&err), 2);
    }

    #[test]
    fn every_subcommand_has_help_text() {
        let cmd = Cli::command();
        for sub in cmd.get_subcommands() {
            assert!(
                sub.get_about().is_some(),
                "missing help for {}",
                sub.get_name()
            );
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "weekly-links",
            "resolve",
            "--date",
            "09-24",
            "--year",
            "2025",
            "--strict",
        ])
        .expect("parse");
        assert_eq!(cli.year, Some(2025));
        assert!(cli.strict);
        assert!(matches!(cli.command, Commands::Resolve(ref a) if a.date == "09-24"));
    }
}
