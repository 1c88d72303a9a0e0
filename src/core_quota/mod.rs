pub mod error;
pub mod guard; // Quota check wrapped around file creation
pub mod quota;
pub mod usage;

#[cfg(test)]
mod test_quota;

pub use error::QuotaError;
pub use guard::QuotaGuard;
pub use quota::{DiskQuota, QuotaLookup, StorageInfo, StorageQuota};
