pub mod batchpipe_toml;
pub mod config;
pub mod directory;
pub mod env_overrides;
pub mod logger;
pub mod metadata;
pub mod prompt;

pub use config::*;
pub use directory::{Child, Directory};
pub use env_overrides::{apply_env_to_params, parse_bool_flag};
pub use logger::{Colors, setup_logging};
pub use prompt::{confirm, yes_no_question};
