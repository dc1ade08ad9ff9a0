use std::{env, path::PathBuf};

pub const PROGRAM_NAME: &str = "sift";
pub const PROGRAM_LOG_LEVEL: &str = "SIFT_LOG_LEVEL";

/// Set to "0" or "false" to disable transcript recording entirely.
pub const TRANSCRIPT_DISABLED_ENV: &str = "SIFT_TRANSCRIPT";

/// Per-user state directory where transcripts live.
pub fn state_dir() -> Option<PathBuf> {
    // Check XDG_STATE_HOME first (Linux)
    if let Ok(xdg_state) = env::var("XDG_STATE_HOME")
        && !xdg_state.is_empty()
    {
        return Some(PathBuf::from(xdg_state).join(PROGRAM_NAME));
    }

    // Fall back to dirs crate
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join(PROGRAM_NAME))
}

pub fn transcript_dir() -> Option<PathBuf> {
    state_dir().map(|d| d.join("transcripts"))
}
