use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_quota::QuotaError;
use std::io::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VfsError {
    #[error("Ms dos - like path is not supported. Consider using unix-like path.")]
    ForeignSeparator,

    #[error("{0} was not found.")]
    NotFound(String),

    #[error("{0} is not a directory.")]
    NotADirectory(String),

    #[error("{0} already exists.")]
    AlreadyExists(String),

    #[error("Path is outside of the allowed area.")]
    OutsideRoot,

    #[error("Could not remove or rename user base directory.")]
    RootProtected,

    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    #[error("No user is logged in.")]
    NotInitialized,

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl VfsError {
    pub fn to_reply(&self) -> FtpReply {
        match self {
            VfsError::ForeignSeparator => {
                FtpReply::new(ReplyCode::ParameterNotImplemented, self.to_string())
            }
            VfsError::Quota(e) => e.to_reply(),
            VfsError::Io(e) => match e.kind() {
                ErrorKind::NotFound => FtpReply::new(ReplyCode::FileNoAccess, e.to_string()),
                _ => FtpReply::new(ReplyCode::FileBusy, e.to_string()),
            },
            _ => FtpReply::new(ReplyCode::FileNoAccess, self.to_string()),
        }
    }

    /// Running out of storage ends the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VfsError::Quota(QuotaError::QuotaExceeded(_)))
    }
}
