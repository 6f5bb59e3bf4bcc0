//! Environment overrides for pipeline params: process env → `.env` in dir.

use log::{debug, warn};
use std::path::Path;

use crate::PipelineParams;
use crate::utils::config::PackagePaths;

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn try_env_then_dotenv(dir: &Path, name: &str) -> Option<String> {
    if let Some(s) = non_empty_var(name) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_var(name);
    }
    None
}

/// Parse a boolean the way the yes/no prompt does (`1`, `true`, `yes`, ...).
pub fn parse_bool_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "y" | "yes" | "1" | "t" | "true" | "on" => Some(true),
        "n" | "no" | "0" | "f" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Apply `<PKG>_N_CORES` and `<PKG>_OVERWRITE` (process env, then `.env` in `dir`). Unparseable values are ignored with a warning.
pub fn apply_env_to_params(dir: &Path, params: &mut PipelineParams) {
    let paths = PackagePaths::get();

    let n_cores_var = paths.env_var("n_cores");
    if let Some(s) = try_env_then_dotenv(dir, &n_cores_var) {
        match s.parse::<usize>() {
            Ok(n) => {
                debug!("{} = {}", n_cores_var, n);
                params.n_cores = n;
            }
            Err(e) => warn!("ignoring {}={:?}: {}", n_cores_var, s, e),
        }
    }

    let overwrite_var = paths.env_var("overwrite");
    if let Some(s) = try_env_then_dotenv(dir, &overwrite_var) {
        match parse_bool_flag(&s) {
            Some(b) => {
                debug!("{} = {}", overwrite_var, b);
                params.overwrite = b;
            }
            None => warn!("ignoring {}={:?}: not a boolean", overwrite_var, s),
        }
    }
}
