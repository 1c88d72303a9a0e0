// Errors of the quota subsystem
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotaError {
    #[error("Can't copy the files because your cloud storage limit exceeded ({0}).")]
    QuotaExceeded(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Failed to read storage usage: {0}")]
    UsageReadError(String),
}

impl QuotaError {
    pub fn to_reply(&self) -> FtpReply {
        match self {
            QuotaError::QuotaExceeded(_) => FtpReply::new(
                ReplyCode::InsufficientStorage,
                "Requested file action aborted. Exceeded storage allocation.",
            ),
            _ => FtpReply::new(
                ReplyCode::LocalError,
                format!("Requested action aborted. Local error in processing: {}", self),
            ),
        }
    }
}
