use crate::constants::is_anonymous;
use crate::core_quota::error::QuotaError;
use crate::core_quota::usage::directory_size;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage figures of one account, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInfo {
    pub occupied: u64,
    pub free: u64,
    pub total: u64,
}

impl StorageInfo {
    pub fn new(occupied: u64, total: u64) -> Self {
        Self {
            occupied,
            free: total.saturating_sub(occupied),
            total,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.occupied >= self.total
    }
}

/// Answers "how much may this account hold, and how much does it hold".
pub trait StorageQuota: Send + Sync {
    fn storage_info(&self, username: &str) -> Result<StorageInfo, QuotaError>;
}

/// Persisted allotment of registered accounts.
pub trait QuotaLookup: Send + Sync {
    fn allotted_bytes(&self, username: &str) -> Option<u64>;
}

/// Quota computed from the on-disk size of `base_dir/<username>`.
///
/// Nothing is cached: every call walks the user's tree again.
pub struct DiskQuota {
    base_dir: PathBuf,
    default_total: u64,
    lookup: Arc<dyn QuotaLookup>,
}

impl DiskQuota {
    pub fn new(base_dir: PathBuf, default_total: u64, lookup: Arc<dyn QuotaLookup>) -> Self {
        Self {
            base_dir,
            default_total,
            lookup,
        }
    }
}

impl StorageQuota for DiskQuota {
    fn storage_info(&self, username: &str) -> Result<StorageInfo, QuotaError> {
        // The public account has no persisted record.
        let total = if is_anonymous(username) {
            self.default_total
        } else {
            self.lookup
                .allotted_bytes(username)
                .ok_or_else(|| QuotaError::UserNotFound(username.to_string()))?
        };

        let occupied = directory_size(&self.base_dir.join(username))
            .map_err(|e| QuotaError::UsageReadError(e.to_string()))?;

        Ok(StorageInfo::new(occupied, total))
    }
}
