use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{TRANSCRIPT_DISABLED_ENV, transcript_dir};

pub const TRANSCRIPT_VERSION: u8 = 1;

/// File name prefix for rolling transcript files: `sift-2026-08-29.log`.
const TRANSCRIPT_PREFIX: &str = "sift-";
const TRANSCRIPT_SUFFIX: &str = ".log";

/// One diagnostic event appended to the current transcript.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptEvent {
    /// Schema version
    pub version: u8,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Which command produced the event (e.g. "list", "prune").
    pub command: String,

    /// Number of records the selection produced.
    pub hits: usize,

    /// Wall time of the operation in milliseconds.
    pub duration_ms: u32,
}

impl TranscriptEvent {
    pub fn new(command: String, hits: usize, duration_ms: u32) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            timestamp: Utc::now(),
            command,
            hits,
            duration_ms,
        }
    }
}

/// Rolling transcript store: one line-encoded JSON file per calendar day.
///
/// Retention over old transcript files is the caller's job; the store only
/// appends to and enumerates them.
pub struct TranscriptStore {
    dir: PathBuf,
}

fn transcripts_disabled() -> bool {
    match env::var(TRANSCRIPT_DISABLED_ENV) {
        Ok(val) => val == "0" || val.eq_ignore_ascii_case("false"),
        Err(_) => false,
    }
}

impl TranscriptStore {
    pub fn new() -> Option<Self> {
        if transcripts_disabled() {
            return None;
        }

        let dir = transcript_dir()?;
        Some(Self { dir })
    }

    /// Create a store rooted at a custom directory (for testing).
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the transcript file events are currently appended to.
    pub fn current_file(&self) -> PathBuf {
        let day = Utc::now().format("%Y-%m-%d");
        self.dir
            .join(format!("{TRANSCRIPT_PREFIX}{day}{TRANSCRIPT_SUFFIX}"))
    }

    /// Best-effort append; failures are logged and swallowed.
    pub fn record(&self, event: TranscriptEvent) {
        if let Err(e) = self.append_event(&event) {
            debug!("Failed to record transcript event: {}", e);
        }
    }

    fn append_event(&self, event: &TranscriptEvent) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut line = serde_json::to_string(event).map_err(io::Error::other)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_file())?;

        // One line-encoded JSON event per write; O_APPEND makes each write
        // call append atomically. write_all may still split a line across
        // calls under interruption, which is acceptable for a best-effort
        // diagnostic transcript.
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// All transcript files currently on disk, in directory order.
    /// Only files matching the `sift-*.log` naming scheme are returned.
    pub fn transcript_files(&self) -> io::Result<Vec<PathBuf>> {
        let rd = match fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        for entry in rd {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(TRANSCRIPT_PREFIX) && name.ends_with(TRANSCRIPT_SUFFIX) {
                files.push(entry.path());
            }
        }

        Ok(files)
    }

    /// Parse every event in one transcript file, skipping malformed lines.
    pub fn read_events(&self, path: &Path) -> Vec<TranscriptEvent> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for line in reader.lines() {
            match line {
                Ok(line) => match serde_json::from_str(&line) {
                    Ok(ev) => events.push(ev),
                    Err(e) => debug!("Skipping malformed transcript line: {e}"),
                },
                Err(e) => {
                    debug!("Error reading transcript file: {e}");
                    break;
                }
            }
        }

        events
    }

    /// The most recent `limit` events from today's transcript, newest first.
    pub fn recent_events(&self, limit: usize) -> Vec<TranscriptEvent> {
        let mut events = self.read_events(&self.current_file());
        events.reverse();
        events.truncate(limit);
        events
    }

    /// Remove every transcript file. Missing files are not an error.
    pub fn clear(&self) -> io::Result<usize> {
        let mut removed = 0;
        for path in self.transcript_files()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
