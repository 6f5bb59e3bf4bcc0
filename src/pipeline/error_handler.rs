use anyhow::Result;

use crate::utils::Colors;
use crate::{PipelineParams, RunSummary};

/// Check a finished run: in strict mode the first failure (or a crash) becomes the error;
/// otherwise failures are logged and the run counts as done.
/// Call after joining workers.
pub fn check_run_summary(params: &PipelineParams, summary: &RunSummary) -> Result<()> {
    if summary.is_complete() {
        log::debug!(
            "{}",
            Colors::colorize(
                Colors::PROCESSED,
                &format!("Processed {} items", summary.processed)
            )
        );
        return Ok(());
    }

    if params.strict {
        if let Some(first) = summary.failed.first() {
            return Err(anyhow::anyhow!(
                "{} of {} items failed; first: {}",
                summary.failed.len(),
                summary.enqueued,
                first
            ));
        }
        return Err(anyhow::anyhow!(
            "{} worker(s) crashed; {} of {} items left unprocessed",
            summary.crashed_workers,
            summary.unprocessed(),
            summary.enqueued
        ));
    }

    if !summary.failed.is_empty() {
        log::warn!(
            "{}",
            Colors::colorize(
                Colors::FAILED,
                &format!(
                    "{} of {} items failed",
                    summary.failed.len(),
                    summary.enqueued
                )
            )
        );
        for f in &summary.failed {
            log::debug!("  {}", f);
        }
    }
    if summary.crashed_workers > 0 || summary.unprocessed() > 0 {
        log::warn!(
            "{} worker(s) crashed; {} items unprocessed",
            summary.crashed_workers,
            summary.unprocessed()
        );
    }
    Ok(())
}
