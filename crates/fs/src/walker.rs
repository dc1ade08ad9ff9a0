use std::{
    fs::{self, read_dir},
    io::Result,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::{filter::NameFilter, record::FileRecord};

/// Batch size for sending records through the channel.
/// Larger batches reduce channel overhead but increase latency.
const BATCH_SIZE: usize = 64;

pub struct WalkOptions {
    /// Descend into subdirectories.
    pub recurse: bool,
    /// File-name glob filter; directories are never filtered by it.
    pub filter: NameFilter,
    /// Worker thread count.
    pub num_threads: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            recurse: true,
            filter: NameFilter::any(),
            num_threads: 4,
        }
    }
}

/// Enumerate files under `root` into `FileRecord`s.
///
/// Multi-threaded walk using crossbeam channels: a work queue of directories
/// shared by worker threads, with a pending counter to detect completion.
/// Records are batched before sending to reduce channel overhead. Unreadable
/// directories and entries are logged and skipped, never fatal. Symlinks are
/// not followed; only regular files produce records.
pub fn enumerate(root: &Path, opts: &WalkOptions) -> Vec<FileRecord> {
    let (file_tx, file_rx) = channel::unbounded::<Vec<FileRecord>>();
    let (work_tx, work_rx) = channel::unbounded::<PathBuf>();

    // Track pending directories to know when to terminate
    let pending = AtomicUsize::new(1);
    let _ = work_tx.send(root.to_path_buf());

    debug!(
        "[enumerate] walking {:?} with {} threads",
        root, opts.num_threads
    );

    let mut records = Vec::new();

    thread::scope(|s| {
        for _thread_id in 0..opts.num_threads.max(1) {
            let work_rx = work_rx.clone();
            let work_tx = work_tx.clone();
            let file_tx = file_tx.clone();
            let pending = &pending;

            s.spawn(move || {
                worker_loop(work_rx, work_tx, file_tx, opts, pending);
            });
        }

        // Workers hold the remaining clones; the receive loop below ends
        // once the last worker exits.
        drop(work_tx);
        drop(file_tx);

        for batch in file_rx {
            records.extend(batch);
        }
    });

    records
}

fn worker_loop(
    work_rx: channel::Receiver<PathBuf>,
    work_tx: channel::Sender<PathBuf>,
    file_tx: Sender<Vec<FileRecord>>,
    opts: &WalkOptions,
    pending: &AtomicUsize,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    loop {
        // Use timeout to periodically check if all work is done
        match work_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(dir) => {
                if let Err(e) = scan_dir(&dir, &work_tx, &mut batch, opts, pending) {
                    warn!("[worker] scan_dir({:?}) failed: {e}", dir);
                }
                // Send batch if it's full
                if batch.len() >= BATCH_SIZE {
                    let to_send = std::mem::take(&mut batch);
                    if file_tx.send(to_send).is_err() {
                        return;
                    }
                }

                // Decrement pending counter after processing directory
                if pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                    // Last item! Done!
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                // Check if all work is done
                if pending.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    // Send any remaining records
    if !batch.is_empty() {
        let _ = file_tx.send(batch);
    }
}

/// Scan one directory: queue subdirectories (when recursing) and collect
/// matching file records into the batch.
fn scan_dir(
    dir: &Path,
    work_tx: &channel::Sender<PathBuf>,
    batch: &mut Vec<FileRecord>,
    opts: &WalkOptions,
    pending: &AtomicUsize,
) -> Result<()> {
    let rd = match read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("[walk] read_dir({:?}) failed: {e}", dir);
            return Ok(());
        }
    };

    for entry_res in rd {
        let entry = match entry_res {
            Ok(e) => e,
            Err(e) => {
                warn!("[walk] error reading entry in {:?}: {e}", dir);
                continue;
            }
        };

        match inspect_fs_entry(&entry, opts) {
            Ok(Outcome::File(record)) => batch.push(record),
            Ok(Outcome::Dir(path)) => {
                if opts.recurse {
                    // Increment pending count before sending subdirectory
                    pending.fetch_add(1, Ordering::AcqRel);
                    let _ = work_tx.send(path);
                }
            }
            Ok(Outcome::Skip) => {}
            Err(e) => {
                warn!("[walk] inspect_entry error in {:?}: {e}", dir);
            }
        }
    }

    Ok(())
}

enum Outcome {
    File(FileRecord),
    Dir(PathBuf),
    Skip,
}

fn inspect_fs_entry(entry: &fs::DirEntry, opts: &WalkOptions) -> Result<Outcome> {
    let metadata = entry.metadata()?;
    let path = entry.path();

    if metadata.is_symlink() {
        return Ok(Outcome::Skip);
    }
    if metadata.is_dir() {
        return Ok(Outcome::Dir(path));
    }
    if !metadata.is_file() {
        // Sockets, fifos, devices
        return Ok(Outcome::Skip);
    }

    let name_os = entry.file_name();
    let name = match name_os.to_str() {
        Some(s) => s.to_owned(),
        None => return Ok(Outcome::Skip),
    };

    if !opts.filter.matches(&name) {
        return Ok(Outcome::Skip);
    }

    // Creation time can be unreported on many UNIX filesystems; it defaults
    // to 0 (epoch), same for a failed accessed-time lookup.
    let size = metadata.len();
    let mtime_secs = to_unix_secs(metadata.modified().ok());
    let ctime_secs = to_unix_secs(metadata.created().ok());
    let atime_secs = to_unix_secs(metadata.accessed().ok());

    Ok(Outcome::File(FileRecord {
        path,
        name,
        size,
        mtime_secs,
        ctime_secs,
        atime_secs,
    }))
}

fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
