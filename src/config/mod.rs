use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub resolve: ResolveConfig,
    pub generate: GenerateConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveConfig {
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateConfig {
    pub days: u32,
    pub source: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig { color: true },
            resolve: ResolveConfig {
                strict: false,
                reference_year: None,
            },
            generate: GenerateConfig {
                days: 7,
                source: "test_data".to_string(),
            },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    resolve: Option<RawResolveConfig>,
    generate: Option<RawGenerateConfig>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawResolveConfig {
    strict: Option<bool>,
    reference_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawGenerateConfig {
    days: Option<u32>,
    source: Option<String>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/weekly-links/config.toml")
}

pub fn effective_home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("HOME is not set"))
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }

    if let Some(resolve) = raw.resolve {
        if let Some(strict) = resolve.strict {
            cfg.resolve.strict = strict;
        }
        if resolve.reference_year.is_some() {
            cfg.resolve.reference_year = resolve.reference_year;
        }
    }

    if let Some(generate) = raw.generate {
        if let Some(days) = generate.days {
            cfg.generate.days = days;
        }
        if let Some(source) = generate.source {
            cfg.generate.source = source;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("WEEKLY_LINKS_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "WEEKLY_LINKS_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("WEEKLY_LINKS_RESOLVE_STRICT") {
        cfg.resolve.strict = parse_bool(&v).with_context(|| "WEEKLY_LINKS_RESOLVE_STRICT")?;
    }
    if let Ok(v) = std::env::var("WEEKLY_LINKS_RESOLVE_REFERENCE_YEAR") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.resolve.reference_year = Some(
                v.parse::<i32>()
                    .with_context(|| "WEEKLY_LINKS_RESOLVE_REFERENCE_YEAR")?,
            );
        }
    }
    if let Ok(v) = std::env::var("WEEKLY_LINKS_GENERATE_DAYS") {
        cfg.generate.days = v
            .trim()
            .parse::<u32>()
            .with_context(|| "WEEKLY_LINKS_GENERATE_DAYS")?;
    }
    if let Ok(v) = std::env::var("WEEKLY_LINKS_GENERATE_SOURCE") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.generate.source = v.to_string();
        }
    }

    Ok(())
}

fn validate(cfg: &EffectiveConfig) -> Result<()> {
    if let Some(year) = cfg.resolve.reference_year {
        if !(0..=9999).contains(&year) {
            anyhow::bail!("resolve.reference_year must be a 4-digit year: {year}");
        }
    }
    let max_days = crate::generate::MAX_DAYS;
    if !(1..=max_days).contains(&cfg.generate.days) {
        anyhow::bail!(
            "generate.days must be between 1 and {max_days}: {}",
            cfg.generate.days
        );
    }
    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (use true|false|1|0|yes|no|on|off)"
        )),
    }
}
