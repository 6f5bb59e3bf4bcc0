//! Progress bar utilities for displaying processing status

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation
    )))
}

/// Advance the bar by `n`. Called from handlers on worker threads; blocks briefly on the bar lock
/// so no completed item goes uncounted.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.lock() {
        let _ = pb.update(n);
    }
}

/// Bar for `total` items when `verbose`, otherwise none.
pub fn maybe_progress_bar(verbose: bool, total: usize, desc: &'static str) -> Option<ProgressBar> {
    verbose.then(|| create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic)))
}
