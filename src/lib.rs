pub mod audio;
pub mod config;
pub mod error;
pub mod interactive;
pub mod pipeline;

pub use config::ChopConfig;
pub use error::{ChopError, Result};
pub use pipeline::{
    list_wav_files, print_summary, process_buffer, process_file, run_batch, BatchReport,
    FileReport,
};
