use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    #[error("User name {0} is reserved.")]
    ReservedUserName(String),

    #[error("User {0} already exists.")]
    UserExists(String),

    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Malformed passwd line {line}: {reason}")]
    MalformedEntry { line: usize, reason: String },

    #[error("User database I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    pub fn to_reply(&self) -> FtpReply {
        match self {
            AuthError::HashError(_) | AuthError::Io(_) | AuthError::MalformedEntry { .. } => {
                FtpReply::new(ReplyCode::LocalError, self.to_string())
            }
            _ => FtpReply::new(ReplyCode::FileNoAccess, self.to_string()),
        }
    }
}
