use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::config::Config;
use crate::model::CommunityRecord;

/// Snapshot + record file locations for one community.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

impl OutputPaths {
    pub fn for_slug(cfg: &Config, slug: &str) -> Self {
        let stem = format!("{}_{}", cfg.file_prefix, slug);
        Self {
            html: cfg.html_dir().join(format!("{}.html", stem)),
            json: cfg.json_dir().join(format!("{}.json", stem)),
        }
    }

    /// An existing record means the community was already scraped.
    pub fn is_done(&self) -> bool {
        self.json.exists()
    }
}

/// Last non-empty path segment, without query or fragment.
pub fn community_slug(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(last) = parsed
            .path_segments()
            .and_then(|segs| segs.filter(|s| !s.is_empty()).last())
        {
            return last.to_string();
        }
    }

    // Not a parseable absolute URL: split by hand.
    let parts: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
    let last = match parts.as_slice() {
        [.., prev, last] if last.starts_with('#') => *prev,
        [.., last] => *last,
        [] => "",
    };
    last.split(['?', '#']).next().unwrap_or_default().to_string()
}

pub fn write_snapshot(path: &Path, html: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_record(path: &Path, record: &CommunityRecord) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Batch input: a JSON array of URL strings.
pub fn load_links(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read links file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of URLs", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
}
