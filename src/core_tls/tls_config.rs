use crate::core_tls::error::TlsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[tls]` section. One certificate serves the control channel and every
/// data channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// When false, AUTH and PROT P are refused with 534
    pub enabled: bool,
    pub cert_file: PathBuf,
    /// PKCS#1, PKCS#8 or SEC1
    pub key_file: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cert_file: PathBuf::from("/etc/cloudftpd/tls/cert.pem"),
            key_file: PathBuf::from("/etc/cloudftpd/tls/key.pem"),
        }
    }
}

impl TlsConfig {
    pub fn validate(&self) -> Result<(), TlsError> {
        if !self.enabled {
            return Ok(());
        }
        if !self.cert_file.is_file() {
            return Err(TlsError::CertificateLoadError(format!(
                "{:?} is not a readable file",
                self.cert_file
            )));
        }
        if !self.key_file.is_file() {
            return Err(TlsError::PrivateKeyLoadError(format!(
                "{:?} is not a readable file",
                self.key_file
            )));
        }
        Ok(())
    }
}
