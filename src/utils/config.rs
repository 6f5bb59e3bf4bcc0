//! Application configuration: process-wide pipeline parameters and constants.

use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, PoisonError, RwLock};

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    /// Per-directory config file, e.g. `.batchpipe.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `key`, e.g. `BATCHPIPE_N_CORES`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key.to_uppercase())
    }

    /// Thread name for worker `i`.
    pub fn worker_name(&self, i: usize) -> String {
        format!("{}-worker-{i}", self.pkg_name)
    }
}

// ---- Pipeline parameters ----

/// Tunables shared by every pipeline instance unless one is given explicit params.
///
/// `n_cores == 1` selects the serial path (no threads spawned). Any other value runs a pool
/// of that many workers. `overwrite` is read by generators that stage outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub n_cores: usize,
    pub overwrite: bool,
    /// Turn item failures and worker crashes into an error from `run` instead of a summary.
    pub strict: bool,
}

static GLOBAL_PARAMS: RwLock<PipelineParams> = RwLock::new(PipelineParams::DEFAULT);

impl PipelineParams {
    pub const DEFAULT_N_CORES: usize = 4;

    pub const DEFAULT: Self = Self {
        n_cores: Self::DEFAULT_N_CORES,
        overwrite: false,
        strict: false,
    };

    /// Snapshot of the process-wide params. Pipelines without explicit params read this at the start of each call.
    pub fn global() -> Self {
        *GLOBAL_PARAMS.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the process-wide params. Set before starting pipelines; running calls keep their snapshot.
    pub fn set_global(params: Self) {
        *GLOBAL_PARAMS.write().unwrap_or_else(PoisonError::into_inner) = params;
    }

    /// Mutate the process-wide params in place.
    pub fn update_global(f: impl FnOnce(&mut Self)) {
        let mut guard = GLOBAL_PARAMS.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    pub fn serial() -> Self {
        Self {
            n_cores: 1,
            ..Self::DEFAULT
        }
    }

    pub fn with_n_cores(mut self, n_cores: usize) -> Self {
        self.n_cores = n_cores;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Worker count with `0` clamped to `1`.
    pub fn worker_count(&self) -> usize {
        self.n_cores.max(1)
    }

    /// False only for the degenerate single-worker (serial) path.
    pub fn parallelize(&self) -> bool {
        self.worker_count() != 1
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---- Hashing (CLI digest job) ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

/// Default extension appended to digest output files.
pub const DEFAULT_DIGEST_EXT: &str = "b3";
