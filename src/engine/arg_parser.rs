use clap::Parser;
use std::path::PathBuf;

/// Digest every file of a directory tree on a fixed worker pool.
#[derive(Clone, Parser)]
#[command(name = "batchpipe")]
#[command(about = "Run the batch digest pipeline: one blake3 digest file per input file.")]
pub struct Cli {
    /// Directory whose files are digested.
    #[arg(value_name = "INPUT_DIR")]
    pub input: PathBuf,

    /// Directory receiving one digest file per input file (mirrors the input tree).
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Worker count. 1 runs serially in-process. Default: config file, env, then 4.
    #[arg(long, short = 'n', value_parser = clap::value_parser!(usize))]
    pub n_cores: Option<usize>,

    /// Recompute digests whose output file already exists.
    #[arg(long, short = 'o', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub overwrite: Option<bool>,

    /// Do not ask before overwriting existing outputs.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Verbose output and progress bar.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Extension appended to each digest file name.
    #[arg(long, short = 'e')]
    pub ext: Option<String>,

    /// Follow symlinks while walking INPUT_DIR.
    #[arg(long, short = 'L', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Fail when any item fails or a worker crashes.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Write the run summary as JSON to this path.
    #[arg(long, short = 's')]
    pub summary: Option<PathBuf>,
}
