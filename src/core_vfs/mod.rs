// Per-user virtual filesystem: path confinement and FTP <-> local translation

pub mod entry;
pub mod error;
pub mod filesystem;
pub mod path;

pub use entry::{EntryType, FileSystemEntry};
pub use error::VfsError;
pub use filesystem::VirtualFileSystem;
