pub mod capsflow_toml;
pub mod config;
pub mod fixture;
pub mod logger;
pub mod tempfiles;

pub use capsflow_toml::{apply_file_to_opts, load_capsflow_toml};
pub use config::*;
pub use fixture::{write_sample_input, write_sample_input_mib};
pub use logger::setup_logging;
pub use tempfiles::{discard_temp, remove_stale_temp, rename_temp_to_final, temp_path_for};
