use crate::constants::{is_anonymous, USERNAME_REGEX};
use crate::core_auth::core_auth::PasswdEntry;
use crate::core_auth::error::AuthError;
use crate::core_auth::helper::{hash_password, verify_password};
use crate::core_quota::QuotaLookup;
use bcrypt::DEFAULT_COST;
use log::{info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Checks a login. Blocking; call from `spawn_blocking`.
pub trait AuthProvider: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Adds accounts at runtime (`SITE REG`). Blocking.
pub trait UserRegistry: Send + Sync {
    fn register(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// File-backed user database.
///
/// The whole file is read once at startup and kept in memory. Registrations
/// are appended to the file while the write lock is held, so two sessions
/// registering the same name cannot both succeed.
pub struct PasswdDatabase {
    path: PathBuf,
    allow_anonymous: bool,
    default_total: u64,
    cost: u32,
    username_regex: Regex,
    entries: RwLock<HashMap<String, PasswdEntry>>,
}

impl PasswdDatabase {
    /// Loads `path`. A missing file is an empty database.
    pub fn load(path: &Path, allow_anonymous: bool, default_total: u64) -> Result<Self, AuthError> {
        let mut entries = HashMap::new();
        match fs::read_to_string(path) {
            Ok(content) => {
                for (index, line) in content.lines().enumerate() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    match PasswdEntry::from_line(line) {
                        Some(entry) => {
                            entries.insert(entry.get_username().to_string(), entry);
                        }
                        None => warn!("Skipping malformed line {} in {:?}", index + 1, path),
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("User database {:?} does not exist yet, starting empty", path);
            }
            Err(e) => return Err(e.into()),
        }
        info!("Loaded {} user(s) from {:?}", entries.len(), path);

        let username_regex =
            Regex::new(USERNAME_REGEX).map_err(|e| AuthError::InvalidUserName(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            allow_anonymous,
            default_total,
            cost: DEFAULT_COST,
            username_regex,
            entries: RwLock::new(entries),
        })
    }

    /// Overrides the bcrypt cost used for new registrations.
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn user_count(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PasswdEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PasswdEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    fn append_entry(&self, entry: &PasswdEntry) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }
}

impl AuthProvider for PasswdDatabase {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        if is_anonymous(username) {
            return self.allow_anonymous;
        }

        let hashed = match self.read().get(username) {
            Some(entry) if !entry.is_disabled() => entry.get_hashed_password().to_string(),
            Some(_) => {
                warn!("Login attempt on disabled account {}", username);
                return false;
            }
            None => return false,
        };
        verify_password(password, &hashed)
    }
}

impl UserRegistry for PasswdDatabase {
    fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if is_anonymous(username) {
            return Err(AuthError::ReservedUserName(username.to_string()));
        }
        if !self.username_regex.is_match(username) {
            return Err(AuthError::InvalidUserName(username.to_string()));
        }
        if self.read().contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }

        // Hash outside the lock; the existence check is repeated below.
        let hashed = hash_password(password, self.cost)?;
        let entry = PasswdEntry::new(username, &hashed, self.default_total);

        let mut entries = self.write();
        if entries.contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }
        self.append_entry(&entry)?;
        entries.insert(username.to_string(), entry);
        info!("Registered new user {}", username);
        Ok(())
    }
}

impl QuotaLookup for PasswdDatabase {
    fn allotted_bytes(&self, username: &str) -> Option<u64> {
        self.read().get(username).map(PasswdEntry::get_total_bytes)
    }
}
