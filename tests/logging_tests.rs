//! Log output of a run. Kept in its own binary: it installs the process-wide logger.

use batchpipe::pipeline::{Chain, Handler, ItemGenerator, Kwargs, Pipeline, ScatterPipeline};
use batchpipe::PipelineParams;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::atomic::{AtomicUsize, Ordering};

struct ClampWarnings(AtomicUsize);

impl Log for ClampWarnings {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn && record.args().to_string().contains("n_cores is 0") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOGGER: ClampWarnings = ClampWarnings(AtomicUsize::new(0));

#[test]
fn test_zero_cores_warns_once_per_run() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Warn);
    let params = PipelineParams::DEFAULT.with_n_cores(0);

    let mut pipeline = Pipeline::new(
        ItemGenerator::from_fn(|n: i64, _: &Kwargs| Ok((0..n).map(|i| (i, i)))),
        Chain::new(|x: i64, _: &Kwargs| Ok(x)),
        Handler::noop(),
    )
    .with_params(params);
    let summary = pipeline.call(3).unwrap();
    assert_eq!(summary.workers_spawned, 0);
    assert_eq!(LOGGER.0.load(Ordering::SeqCst), 1);

    let mut scatter =
        ScatterPipeline::new(Chain::new(|x: i64, _: &Kwargs| Ok(x))).with_params(params);
    scatter.call(vec![1, 2]).unwrap();
    assert_eq!(LOGGER.0.load(Ordering::SeqCst), 2);
}
