use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_tls::TlsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Use PORT, PASV or EPSV first.")]
    NotInitialized,

    #[error("Can't open data connection: {0}")]
    Connect(String),

    #[error("Connection closed; transfer aborted: {0}")]
    Transfer(String),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("No free data port in [{min}, {max}) after {attempts} scan(s).")]
    PortPoolExhausted { min: u16, max: u16, attempts: u32 },
}

impl DataError {
    pub fn to_reply(&self) -> FtpReply {
        match self {
            DataError::NotInitialized | DataError::Connect(_) => {
                FtpReply::new(ReplyCode::CantOpenDataConnection, self.to_string())
            }
            DataError::Transfer(_) => FtpReply::new(ReplyCode::TransferAborted, self.to_string()),
            DataError::Tls(e) => e.to_reply(),
            DataError::PortPoolExhausted { .. } => {
                FtpReply::new(ReplyCode::ServiceNotAvailable, self.to_string())
            }
        }
    }

    /// Running out of data ports ends the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DataError::PortPoolExhausted { .. })
    }
}
