//! Path utilities for mapping input trees onto output trees

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Output path for `input`: same relative location under `output_root`, with `.ext` appended to the file name.
/// `None` when `input` is not under `input_root`.
pub fn output_path_for(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    ext: &str,
) -> Option<PathBuf> {
    let rel = path_relative_to(input, input_root)?;
    let file_name = rel.file_name()?.to_string_lossy().into_owned();
    let mut out = output_root.join(&rel);
    out.set_file_name(format!("{file_name}.{ext}"));
    Some(out)
}

/// True if `path` lies inside `root` (both canonicalized by the caller).
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Canonicalize the input root (must exist) and the output root (created if missing).
pub fn canonicalize_roots(input_root: &Path, output_root: &Path) -> Result<(PathBuf, PathBuf)> {
    let input_root = input_root
        .canonicalize()
        .with_context(|| format!("canonicalize input directory {}", input_root.display()))?;
    if !input_root.is_dir() {
        anyhow::bail!("{} is not a directory", input_root.display());
    }
    std::fs::create_dir_all(output_root)
        .with_context(|| format!("create output directory {}", output_root.display()))?;
    let output_root = output_root
        .canonicalize()
        .with_context(|| format!("canonicalize output directory {}", output_root.display()))?;
    Ok((input_root, output_root))
}
