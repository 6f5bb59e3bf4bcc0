//! Engine module: the CLI digest job built on the pipeline

pub mod arg_parser;
pub mod cli;
pub mod core;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{apply_cli_to_opts, handle_run, setup_opts};
pub use core::{digest_pairs, digest_pipeline, digest_tree, existing_outputs, pending_count, run_digest};
pub use hashing::{digest_hex, hash_file};
pub use tools::{output_path_for, path_relative_to};
