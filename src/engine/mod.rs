//! Engine module: command-line surface around the pipeline

pub mod arg_parser;
pub mod cli;
pub mod progress;

pub use arg_parser::Cli;
pub use cli::{handle_run, run_transform};
pub use progress::{CliObserver, ProgressBarConfig, create_progress_bar};
