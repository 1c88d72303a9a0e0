use chrono::{DateTime, Datelike, Local, Utc};
use std::fs::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// One directory-listing record, built from live metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemEntry {
    pub name: String,
    pub entry_type: EntryType,
    pub size: u64,
    pub read_only: bool,
    pub last_write_time: DateTime<Utc>,
}

impl FileSystemEntry {
    pub fn from_metadata(name: String, metadata: &Metadata) -> Self {
        let entry_type = if metadata.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };
        let last_write_time = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            name,
            entry_type,
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            read_only: metadata.permissions().readonly(),
            last_write_time,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// Unix `ls -l` style line used by LIST.
    pub fn to_list_line(&self, now: DateTime<Local>) -> String {
        let permissions = match (self.entry_type, self.read_only) {
            (EntryType::Directory, _) => "drwxr-xr-x",
            (EntryType::File, true) => "-r--r--r--",
            (EntryType::File, false) => "-rw-r--r--",
        };

        let modified = self.last_write_time.with_timezone(&Local);
        let date = if modified.year() == now.year() {
            modified.format("%b %d %H:%M").to_string()
        } else {
            modified.format("%b %d  %Y").to_string()
        };

        format!(
            "{} 1 owner group {:>12} {} {}",
            permissions, self.size, date, self.name
        )
    }

    /// Machine-readable fact line used by MLSD and MLST.
    pub fn to_mlsd_line(&self) -> String {
        let (kind, perm) = match (self.entry_type, self.read_only) {
            (EntryType::Directory, _) => ("dir", "cdeflmp"),
            (EntryType::File, true) => ("file", "r"),
            (EntryType::File, false) => ("file", "adfrw"),
        };

        format!(
            "Type={};Size={};Perm={};Modify={}; {}",
            kind,
            self.size,
            perm,
            format_modify_time(&self.last_write_time),
            self.name
        )
    }
}

/// `yyyyMMddHHmmss` in UTC, as used by MDTM and MLSx.
pub fn format_modify_time(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%d%H%M%S").to_string()
}
