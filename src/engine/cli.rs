//! CLI command handler: layer config, confirm overwrites, run the digest pipeline, report.

use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::core::{digest_pairs, existing_outputs, pending_count, run_digest};
use crate::engine::progress::maybe_progress_bar;
use crate::engine::tools::canonicalize_roots;
use crate::utils::batchpipe_toml::{apply_file_to_opts, load_batchpipe_toml};
use crate::utils::{Colors, apply_env_to_params, confirm, metadata, setup_logging};
use crate::RunSummary;

/// Apply CLI flags on top of `opts` (only flags that were given).
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(n) = cli.n_cores {
        opts.params.n_cores = n;
    }
    if let Some(o) = cli.overwrite {
        opts.params.overwrite = o;
    }
    if let Some(s) = cli.strict {
        opts.params.strict = s;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(f) = cli.follow_links {
        opts.follow_links = f;
    }
    if let Some(ref ext) = cli.ext {
        opts.ext = ext.clone();
    }
    if let Some(ref p) = cli.summary {
        opts.summary_path = Some(p.clone());
    }
    opts.assume_yes = cli.yes;
}

/// Defaults → `.batchpipe.toml` in `cwd` → environment → CLI flags.
pub fn setup_opts(cli: &Cli, cwd: &Path) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_batchpipe_toml(cwd) {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_env_to_params(cwd, &mut opts.params);
    apply_cli_to_opts(cli, &mut opts);
    opts
}

fn print_summary(summary: &RunSummary, skipped: usize) {
    info!(
        "{} | {} | {}",
        Colors::colorize(
            Colors::PROCESSED,
            &format!("Processed: {}", summary.processed)
        ),
        Colors::colorize(
            Colors::FAILED,
            &format!("Failed: {}", summary.failed.len())
        ),
        Colors::colorize(Colors::SKIPPED, &format!("Skipped: {}", skipped))
    );
}

/// Run the digest job described by `cli`.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut opts = setup_opts(cli, &cwd);
    setup_logging(opts.verbose);
    debug!("{} CONFIG: {:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let (input_root, output_root) = canonicalize_roots(&cli.input, &cli.output)?;
    // Single walk: the same pairs size the prompt, the bar and the run.
    let pairs = digest_pairs(&input_root, &output_root, &opts.ext, opts.follow_links);
    let existing = existing_outputs(&pairs);

    if opts.params.overwrite && existing > 0 && !opts.assume_yes {
        let question = format!(
            "{} existing outputs in {} will be overwritten. Continue?",
            existing,
            output_root.display()
        );
        if !confirm(&question)? {
            warn!("Not overwriting; keeping existing outputs.");
            opts.params.overwrite = false;
        }
    }
    let pending = pending_count(&pairs, opts.params.overwrite);
    let skipped = pairs.len() - pending;

    let bar = maybe_progress_bar(opts.verbose, pending, "Digesting");
    let summary = run_digest(pairs, opts.params, bar)?;
    print_summary(&summary, skipped);

    if let Some(path) = &opts.summary_path {
        metadata::write_json(path, &summary)?;
        debug!("summary written to {}", path.display());
    }
    Ok(())
}
