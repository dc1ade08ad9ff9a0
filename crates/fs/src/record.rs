use std::path::PathBuf;

/// Which of a record's three timestamps a selection compares on.
/// Exactly one is active per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateProperty {
    Created,
    #[default]
    LastWrite,
    LastAccess,
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// File name
    pub name: String,
    /// File size in bytes; informational only
    pub size: u64,
    /// File last modified time
    pub mtime_secs: u64,
    /// File creation time (0 on filesystems that don't report it)
    pub ctime_secs: u64,
    /// File last accessed time (may be unavailable on some platforms/mount options)
    pub atime_secs: u64,
}

impl FileRecord {
    /// The active timestamp in unix seconds.
    #[inline]
    pub fn timestamp(&self, property: DateProperty) -> u64 {
        match property {
            DateProperty::Created => self.ctime_secs,
            DateProperty::LastWrite => self.mtime_secs,
            DateProperty::LastAccess => self.atime_secs,
        }
    }
}
