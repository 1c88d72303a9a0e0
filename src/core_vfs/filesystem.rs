use crate::constants::FTP_SEPARATOR;
use crate::core_vfs::entry::{format_modify_time, FileSystemEntry};
use crate::core_vfs::error::VfsError;
use crate::core_vfs::path::{ftp_to_local, is_root, parent_ftp_path, resolve_ftp_path};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};

#[derive(Debug, Clone)]
struct UserRoot {
    username: String,
    base: PathBuf,
}

/// Confines one session to `base_dir/<username>` and translates FTP paths.
///
/// Absolute FTP paths are rooted at the user's own directory, never at the
/// server's base directory. Relative paths are resolved against the working
/// directory. Every resolved local path starts with the user's directory.
#[derive(Debug)]
pub struct VirtualFileSystem {
    base_dir: PathBuf,
    user: Option<UserRoot>,
    working_directory: String,
}

impl VirtualFileSystem {
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            user: None,
            working_directory: FTP_SEPARATOR.to_string(),
        }
    }

    /// Creates the user's base directory on first login and resets the
    /// working directory to `/`.
    pub async fn initialize(&mut self, username: &str) -> Result<(), VfsError> {
        if username.is_empty()
            || username == "."
            || username == ".."
            || username.contains(|c: char| c == '/' || c == '\\')
        {
            return Err(VfsError::InvalidUserName(username.to_string()));
        }

        let base = self.base_dir.join(username);
        if !fs::try_exists(&base).await? {
            fs::create_dir_all(&base).await?;
            info!("Created base directory {:?} for user {}", base, username);
        }

        self.user = Some(UserRoot {
            username: username.to_string(),
            base,
        });
        self.working_directory = FTP_SEPARATOR.to_string();
        Ok(())
    }

    /// Forgets the logged-in user.
    pub fn reset(&mut self) {
        self.user = None;
        self.working_directory = FTP_SEPARATOR.to_string();
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    fn user_base(&self) -> Result<&Path, VfsError> {
        self.user
            .as_ref()
            .map(|u| u.base.as_path())
            .ok_or(VfsError::NotInitialized)
    }

    /// Returns the normalized FTP path together with its local path.
    fn resolve(&self, ftp_path: &str) -> Result<(String, PathBuf), VfsError> {
        let user_base = self.user_base()?;
        let ftp = resolve_ftp_path(&self.working_directory, ftp_path)?;
        let local = ftp_to_local(user_base, &ftp)?;
        Ok((ftp, local))
    }

    pub fn local_path(&self, ftp_path: &str) -> Result<PathBuf, VfsError> {
        self.resolve(ftp_path).map(|(_, local)| local)
    }

    fn resolve_or_cwd(&self, ftp_path: Option<&str>) -> Result<(String, PathBuf), VfsError> {
        match ftp_path {
            Some(path) if !path.trim().is_empty() => self.resolve(path),
            _ => self.resolve(&self.working_directory.clone()),
        }
    }

    /// Changes the working directory. A missing directory is created rather
    /// than reported as not found.
    pub async fn change_working_directory(&mut self, ftp_path: &str) -> Result<&str, VfsError> {
        if ftp_path == ".." {
            self.move_up();
            return Ok(&self.working_directory);
        }

        let (ftp, local) = self.resolve(ftp_path)?;
        match fs::metadata(&local).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(VfsError::NotADirectory(ftp)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&local).await?;
                debug!("CWD created missing directory {:?}", local);
            }
            Err(e) => return Err(e.into()),
        }

        self.working_directory = ftp;
        Ok(&self.working_directory)
    }

    pub fn move_up(&mut self) {
        self.working_directory = parent_ftp_path(&self.working_directory);
    }

    /// Lists `ftp_path` (or the working directory). A file path yields a
    /// single entry.
    pub async fn enumerate_directory(
        &self,
        ftp_path: Option<&str>,
    ) -> Result<Vec<FileSystemEntry>, VfsError> {
        let (ftp, local) = self.resolve_or_cwd(ftp_path)?;
        let metadata = metadata_or_not_found(&local, &ftp).await?;
        if !metadata.is_dir() {
            return Ok(vec![FileSystemEntry::from_metadata(file_name(&ftp), &metadata)]);
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&local).await?;
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            match item.metadata().await {
                Ok(metadata) => entries.push(FileSystemEntry::from_metadata(name, &metadata)),
                Err(e) => warn!("Failed to get metadata for entry {:?}: {}", item.path(), e),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub async fn entry_info(&self, ftp_path: Option<&str>) -> Result<FileSystemEntry, VfsError> {
        let (ftp, local) = self.resolve_or_cwd(ftp_path)?;
        let metadata = metadata_or_not_found(&local, &ftp).await?;
        Ok(FileSystemEntry::from_metadata(file_name(&ftp), &metadata))
    }

    /// Creates a directory and returns its FTP path.
    pub async fn create_directory(&self, ftp_path: &str) -> Result<String, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        if fs::try_exists(&local).await? {
            return Err(VfsError::AlreadyExists(ftp));
        }
        fs::create_dir_all(&local).await?;
        Ok(ftp)
    }

    /// Deletes either a directory (recursively) or a file.
    pub async fn delete(&self, ftp_path: &str) -> Result<(), VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        if is_root(&ftp) {
            return Err(VfsError::RootProtected);
        }

        let metadata = metadata_or_not_found(&local, &ftp).await?;
        if metadata.is_dir() {
            fs::remove_dir_all(&local).await?;
        } else {
            fs::remove_file(&local).await?;
        }
        Ok(())
    }

    pub async fn rename(&self, from: &str, to: &str) -> Result<(), VfsError> {
        let (from_ftp, from_local) = self.resolve(from)?;
        let (to_ftp, to_local) = self.resolve(to)?;
        if is_root(&from_ftp) || is_root(&to_ftp) {
            return Err(VfsError::RootProtected);
        }

        metadata_or_not_found(&from_local, &from_ftp).await?;
        fs::rename(&from_local, &to_local).await?;
        Ok(())
    }

    /// Opens a file for download.
    pub async fn open_file(&self, ftp_path: &str) -> Result<File, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        let metadata = metadata_or_not_found(&local, &ftp).await?;
        if metadata.is_dir() {
            return Err(VfsError::NotFound(ftp));
        }
        Ok(File::open(&local).await?)
    }

    pub async fn file_size(&self, ftp_path: &str) -> Result<u64, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        let metadata = metadata_or_not_found(&local, &ftp).await?;
        if metadata.is_dir() {
            return Err(VfsError::NotFound(ftp));
        }
        Ok(metadata.len())
    }

    /// Modification time formatted as `yyyyMMddHHmmss` (UTC).
    pub async fn last_modified(&self, ftp_path: &str) -> Result<String, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        let metadata = metadata_or_not_found(&local, &ftp).await?;
        let modified = DateTime::<Utc>::from(metadata.modified()?);
        Ok(format_modify_time(&modified))
    }

    /// Creates a file that must not exist yet. Quota is not checked here;
    /// see `QuotaGuard`.
    pub async fn create_new_file(&self, ftp_path: &str) -> Result<File, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&local)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => VfsError::AlreadyExists(ftp),
                _ => e.into(),
            })
    }

    /// Creates or truncates a file. Quota is not checked here; see
    /// `QuotaGuard`.
    pub async fn create_new_file_or_overwrite(&self, ftp_path: &str) -> Result<File, VfsError> {
        let (ftp, local) = self.resolve(ftp_path)?;
        if is_root(&ftp) {
            return Err(VfsError::RootProtected);
        }
        Ok(File::create(&local).await?)
    }
}

async fn metadata_or_not_found(local: &Path, ftp: &str) -> Result<std::fs::Metadata, VfsError> {
    fs::metadata(local).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => VfsError::NotFound(ftp.to_string()),
        _ => e.into(),
    })
}

fn file_name(ftp_path: &str) -> String {
    match ftp_path.rsplit(FTP_SEPARATOR).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => FTP_SEPARATOR.to_string(),
    }
}
