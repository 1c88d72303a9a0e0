use crate::core_quota::error::QuotaError;
use crate::core_quota::quota::{StorageInfo, StorageQuota};
use crate::core_vfs::{VfsError, VirtualFileSystem};
use log::warn;
use std::sync::Arc;
use tokio::fs::File;

/// Refuses file creation once an account holds as much as it may.
///
/// Wraps the creating calls of [`VirtualFileSystem`]; the check runs before
/// the file is opened, so a refused upload writes nothing.
#[derive(Clone)]
pub struct QuotaGuard {
    quota: Arc<dyn StorageQuota>,
}

impl QuotaGuard {
    pub fn new(quota: Arc<dyn StorageQuota>) -> Self {
        Self { quota }
    }

    pub async fn storage_info(&self, username: &str) -> Result<StorageInfo, QuotaError> {
        let quota = Arc::clone(&self.quota);
        let username = username.to_string();
        tokio::task::spawn_blocking(move || quota.storage_info(&username))
            .await
            .map_err(|e| QuotaError::UsageReadError(e.to_string()))?
    }

    /// Fails with `QuotaExceeded` once the logged-in account is full.
    pub async fn ensure_space(&self, vfs: &VirtualFileSystem) -> Result<(), VfsError> {
        let username = vfs.username().ok_or(VfsError::NotInitialized)?;
        let info = self.storage_info(username).await?;
        if info.is_exhausted() {
            warn!(
                "User {} is out of space: {} of {} bytes occupied",
                username, info.occupied, info.total
            );
            return Err(QuotaError::QuotaExceeded(username.to_string()).into());
        }
        Ok(())
    }

    pub async fn create_new_file(
        &self,
        vfs: &VirtualFileSystem,
        ftp_path: &str,
    ) -> Result<File, VfsError> {
        self.ensure_space(vfs).await?;
        vfs.create_new_file(ftp_path).await
    }

    pub async fn create_new_file_or_overwrite(
        &self,
        vfs: &VirtualFileSystem,
        ftp_path: &str,
    ) -> Result<File, VfsError> {
        self.ensure_space(vfs).await?;
        vfs.create_new_file_or_overwrite(ftp_path).await
    }
}
