mod config;
pub mod logging;
pub mod transcript;

pub use config::{
    PROGRAM_LOG_LEVEL, PROGRAM_NAME, TRANSCRIPT_DISABLED_ENV, state_dir, transcript_dir,
};

pub use logging::init;
