use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TlsError {
    #[error("Failed to load SSL certificate: {0}")]
    CertificateLoadError(String),

    #[error("Failed to load SSL private key: {0}")]
    PrivateKeyLoadError(String),

    #[error("TLS handshake failed: {0}")]
    TlsHandshakeError(String),

    #[error("TLS configuration error: {0}")]
    TlsConfigError(String),

    #[error("TLS not configured")]
    TlsNotConfigured,
}

impl TlsError {
    pub fn to_reply(&self) -> FtpReply {
        match self {
            TlsError::TlsNotConfigured => FtpReply::new(
                ReplyCode::SecurityUnavailable,
                "TLS not available. Please configure SSL/TLS in the server.",
            ),
            _ => FtpReply::new(
                ReplyCode::LocalError,
                "Requested action aborted. Local error in processing.",
            ),
        }
    }
}
