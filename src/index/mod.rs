use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::ReportIndex;

/// Where an index is read from: a file, or stdin for `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource<'a> {
    Stdin,
    File(&'a Path),
}

impl<'a> IndexSource<'a> {
    pub fn from_arg(arg: Option<&'a Path>) -> Self {
        match arg {
            None => IndexSource::Stdin,
            Some(p) if p.as_os_str() == "-" => IndexSource::Stdin,
            Some(p) => IndexSource::File(p),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            IndexSource::Stdin => "<stdin>".to_string(),
            IndexSource::File(p) => p.display().to_string(),
        }
    }
}

pub fn load(source: IndexSource<'_>) -> Result<ReportIndex> {
    let text = match source {
        IndexSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .context("failed to read report index from stdin")?;
            buf
        }
        IndexSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report index: {}", path.display()))?,
    };
    parse(&text).with_context(|| format!("invalid report index: {}", source.describe()))
}

pub fn parse(text: &str) -> Result<ReportIndex> {
    let index: ReportIndex =
        serde_json::from_str(text).context("failed to parse report index (JSON)")?;
    Ok(index)
}
