//! Pipeline components: keyword adapter, generator, chain, queue, workers, orchestrators.

pub mod analysis;
pub mod chain;
pub mod context;
pub mod error_handler;
pub mod generator;
pub mod kwargs;
pub mod orchestrator;
pub mod queue;
pub mod scatter;
pub mod worker;

pub use analysis::{IoMapper, PathItem, create_analysis_pipeline, stage_outputs};
pub use chain::{Chain, Handler};
pub use context::{
    PipelineChannels, PipelineTuning, WorkerContext, create_pipeline_channels,
};
pub use error_handler::check_run_summary;
pub use generator::ItemGenerator;
pub use kwargs::{Accepts, KwAdapter, Kwargs, eat_kwargs};
pub use orchestrator::Pipeline;
pub use queue::{QueueFiller, WorkQueue};
pub use scatter::ScatterPipeline;
pub use worker::{drain_queue, join_workers, keep_spawned, process_item, spawn_workers};
