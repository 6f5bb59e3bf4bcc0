//! Load `.batchpipe.toml` from a directory (CLI only). Library callers pass `PipelineParams` directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub struct BatchpipeToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    n_cores: Option<usize>,
    overwrite: Option<bool>,
    strict: Option<bool>,
    verbose: Option<bool>,
    ext: Option<String>,
    summary: Option<String>,
    follow_links: Option<bool>,
}

/// Parse config text. Unknown keys are ignored.
pub fn parse_batchpipe_toml(s: &str) -> Result<BatchpipeToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file from `dir` if present. Returns None if missing or unreadable.
pub fn load_batchpipe_toml(dir: &Path) -> Option<BatchpipeToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_batchpipe_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $target:expr, $sec_field:ident => $target_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $target.$target_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI layers.
pub fn apply_file_to_opts(file: &BatchpipeToml, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts.params, n_cores => n_cores);
    apply_file_opt!(sec, opts.params, overwrite => overwrite);
    apply_file_opt!(sec, opts.params, strict => strict);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    if let Some(ref ext) = sec.ext {
        opts.ext = ext.clone();
    }
    if let Some(ref p) = sec.summary {
        opts.summary_path = Some(PathBuf::from(p));
    }
}
