// Quota scenarios: accounting, anonymous allotment, and the creation guard

use super::*;
use crate::core_vfs::{VfsError, VirtualFileSystem};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

struct FixedAllotments(HashMap<String, u64>);

impl QuotaLookup for FixedAllotments {
    fn allotted_bytes(&self, username: &str) -> Option<u64> {
        self.0.get(username).copied()
    }
}

fn disk_quota(base: &Path, default_total: u64, users: &[(&str, u64)]) -> Arc<DiskQuota> {
    let lookup = FixedAllotments(
        users
            .iter()
            .map(|(name, total)| (name.to_string(), *total))
            .collect(),
    );
    Arc::new(DiskQuota::new(base.to_path_buf(), default_total, Arc::new(lookup)))
}

#[test]
fn test_storage_info_arithmetic() {
    let info = StorageInfo::new(300, 1000);
    assert_eq!(info.free, 700);
    assert!(!info.is_exhausted());

    let over = StorageInfo::new(1200, 1000);
    assert_eq!(over.free, 0);
    assert!(over.is_exhausted());
    assert!(StorageInfo::new(1000, 1000).is_exhausted());
}

#[test]
fn test_directory_size_is_recursive() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
    std::fs::write(dir.path().join("top.bin"), vec![0u8; 100]).unwrap();
    std::fs::write(dir.path().join("a/mid.bin"), vec![0u8; 20]).unwrap();
    std::fs::write(dir.path().join("a/b/deep.bin"), vec![0u8; 3]).unwrap();

    assert_eq!(usage::directory_size(dir.path()).unwrap(), 123);
    assert_eq!(usage::directory_size(&dir.path().join("missing")).unwrap(), 0);
}

#[test]
fn test_registered_user_uses_persisted_allotment() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("bob")).unwrap();
    std::fs::write(dir.path().join("bob/file"), vec![0u8; 40]).unwrap();

    let quota = disk_quota(dir.path(), 10, &[("bob", 1000)]);
    let info = quota.storage_info("bob").unwrap();
    assert_eq!(info, StorageInfo::new(40, 1000));

    assert!(matches!(
        quota.storage_info("carol"),
        Err(QuotaError::UserNotFound(_))
    ));
}

#[test]
fn test_anonymous_uses_default_allotment() {
    let dir = tempfile::tempdir().unwrap();
    let quota = disk_quota(dir.path(), 512, &[]);
    let info = quota.storage_info("anonymous").unwrap();
    assert_eq!(info.total, 512);
    assert_eq!(info.occupied, 0);
}

#[test]
fn test_quota_exceeded_maps_to_insufficient_storage() {
    let reply = QuotaError::QuotaExceeded("bob".into()).to_reply();
    assert_eq!(reply.code.code(), 552);
    let reply = QuotaError::UserNotFound("bob".into()).to_reply();
    assert_eq!(reply.code.code(), 451);
}

#[tokio::test]
async fn test_guard_refuses_creation_once_full() {
    let dir = tempfile::tempdir().unwrap();
    let quota = disk_quota(dir.path(), 0, &[("bob", 100)]);
    let guard = QuotaGuard::new(quota.clone());

    let mut vfs = VirtualFileSystem::new(dir.path().to_path_buf());
    vfs.initialize("bob").await.unwrap();

    // Under the limit: creation goes through, even if the write overshoots.
    let mut file = guard.create_new_file(&vfs, "first.bin").await.unwrap();
    file.write_all(&[1u8; 150]).await.unwrap();
    file.flush().await.unwrap();
    drop(file);

    let before = quota.storage_info("bob").unwrap().occupied;
    assert_eq!(before, 150);

    for name in ["second.bin", "first.bin"] {
        let result = guard.create_new_file_or_overwrite(&vfs, name).await;
        assert!(matches!(&result, Err(e) if e.is_fatal()));
    }
    assert!(matches!(
        guard.create_new_file(&vfs, "third.bin").await,
        Err(VfsError::Quota(QuotaError::QuotaExceeded(_)))
    ));

    // Nothing was created or truncated.
    assert!(!dir.path().join("bob/second.bin").exists());
    assert_eq!(quota.storage_info("bob").unwrap().occupied, before);
}

#[tokio::test]
async fn test_guard_needs_logged_in_user() {
    let dir = tempfile::tempdir().unwrap();
    let guard = QuotaGuard::new(disk_quota(dir.path(), 100, &[]));
    let vfs = VirtualFileSystem::new(dir.path().to_path_buf());
    assert!(matches!(
        guard.create_new_file(&vfs, "x").await,
        Err(VfsError::NotInitialized)
    ));
}
