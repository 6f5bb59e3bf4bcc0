//! Digest job: blake3 every file of an input tree into a mirrored tree of hex digest files.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::hashing::{digest_hex, hash_file};
use super::progress::{ProgressBar, update_progress_bar};
use super::tools::{is_within, output_path_for};
use crate::pipeline::{Kwargs, Pipeline, create_analysis_pipeline};
use crate::utils::{Directory, metadata};
use crate::{PipelineParams, RunSummary};

/// `(input file, digest file)` pairs of one run.
pub type DigestPairs = Vec<(PathBuf, PathBuf)>;

/// A file opened for hashing.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Every file under `input_root` paired with its digest output path. Files already inside
/// `output_root` (when it is nested in the input tree) are left out.
pub fn digest_pairs(
    input_root: &Path,
    output_root: &Path,
    ext: &str,
    follow_links: bool,
) -> DigestPairs {
    Directory::new(input_root)
        .walk_files(follow_links)
        .into_iter()
        .filter(|p| !is_within(p, output_root))
        .filter_map(|input| {
            let output = output_path_for(&input, input_root, output_root, ext)?;
            Some((input, output))
        })
        .collect()
}

/// Outputs of `pairs` that already exist.
pub fn existing_outputs(pairs: &[(PathBuf, PathBuf)]) -> usize {
    pairs.iter().filter(|(_, out)| out.exists()).count()
}

/// Items a run over `pairs` will actually digest.
pub fn pending_count(pairs: &[(PathBuf, PathBuf)], overwrite: bool) -> usize {
    if overwrite {
        pairs.len()
    } else {
        pairs.len() - existing_outputs(pairs)
    }
}

fn read_source(path: PathBuf, _: &Kwargs) -> Result<SourceFile> {
    let size = std::fs::metadata(&path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    Ok(SourceFile { path, size })
}

fn digest_source(src: SourceFile, _: &Kwargs) -> Result<String> {
    let digest = hash_file(&src.path, src.size)?;
    Ok(digest_hex(&digest))
}

/// Build the digest pipeline. The call argument is the pair list from [`digest_pairs`];
/// pairs with an existing digest are staged out unless `params.overwrite`.
pub fn digest_pipeline(
    params: PipelineParams,
    bar: Option<ProgressBar>,
) -> Pipeline<DigestPairs, PathBuf, PathBuf, String> {
    create_analysis_pipeline(
        |pairs: DigestPairs, _: &Kwargs| Ok(pairs),
        read_source,
        digest_source,
        move |output: &Path, hex: String, _: &Kwargs| {
            metadata::write_text(output, &hex)?;
            if let Some(bar) = &bar {
                update_progress_bar(bar, 1);
            }
            Ok(())
        },
    )
    .with_params(params)
}

/// Digest an already walked pair list. `bar`, when given, advances once per written digest;
/// size it with [`pending_count`].
pub fn run_digest(
    pairs: DigestPairs,
    params: PipelineParams,
    bar: Option<ProgressBar>,
) -> Result<RunSummary> {
    let mut pipeline = digest_pipeline(params, bar);
    let summary = pipeline.call(pairs)?;
    debug!(
        "digest: {} processed, {} failed",
        summary.processed,
        summary.failed.len()
    );
    Ok(summary)
}

/// Walk `input_root` once and digest it into `output_root`.
pub fn digest_tree(
    input_root: &Path,
    output_root: &Path,
    ext: &str,
    follow_links: bool,
    params: PipelineParams,
) -> Result<RunSummary> {
    let pairs = digest_pairs(input_root, output_root, ext, follow_links);
    run_digest(pairs, params, None)
}
