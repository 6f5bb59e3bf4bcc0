//! Metadata files keyed by path: JSON (serde_json) and plain text.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub fn exists(path: &Path) -> bool {
    path.exists()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let s = serde_json::to_string_pretty(value).context("serialize JSON")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse JSON in {}", path.display()))
}

/// Write `text` followed by a newline, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, format!("{text}\n")).with_context(|| format!("write {}", path.display()))
}

/// Read a text file, trimming the trailing newline.
pub fn read_text(path: &Path) -> Result<String> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(s.trim_end_matches(['\n', '\r']).to_string())
}
