use crate::core_tls::error::TlsError;
use crate::core_tls::tls_config::TlsConfig;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::rustls;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

/// Server-side TLS acceptor shared by every control and data channel.
///
/// Each call to [`TlsConnection::accept_tls`] runs an independent handshake,
/// so the control channel and the data channels of one session negotiate
/// separately with the same certificate.
pub struct TlsConnection {
    tls_acceptor: TlsAcceptor,
}

impl TlsConnection {
    pub fn new(cert_file: &Path, key_file: &Path) -> Result<Self, TlsError> {
        if !cert_file.exists() || !key_file.exists() {
            return Err(TlsError::TlsNotConfigured);
        }

        let cert_chain = load_certificates(cert_file)?;
        let private_key = load_private_key(key_file)?;

        let config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(cert_chain, private_key)
            .map_err(|e| TlsError::TlsConfigError(e.to_string()))?;

        Ok(Self {
            tls_acceptor: TlsAcceptor::from(Arc::new(config)),
        })
    }

    /// Builds the acceptor if TLS is enabled in the configuration.
    pub fn from_config(config: &TlsConfig) -> Result<Option<Self>, TlsError> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(&config.cert_file, &config.key_file).map(Some)
    }

    pub async fn accept_tls(&self, stream: TcpStream) -> Result<TlsStream<TcpStream>, TlsError> {
        let peer = stream.peer_addr().ok();
        match self.tls_acceptor.accept(stream).await {
            Ok(tls_stream) => {
                debug!("TLS handshake completed with {:?}", peer);
                Ok(tls_stream)
            }
            Err(e) => Err(TlsError::TlsHandshakeError(e.to_string())),
        }
    }
}

fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(path).map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;

    if certs.is_empty() {
        return Err(TlsError::CertificateLoadError(format!(
            "No certificate found in {:?}",
            path
        )));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(path).map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?
        .ok_or_else(|| TlsError::PrivateKeyLoadError("No private key found".to_string()))
}

#[cfg(test)]
pub mod test_support {
    use super::TlsConnection;
    use std::path::Path;
    use std::sync::Arc;
    use tokio_rustls::rustls;
    use tokio_rustls::rustls::pki_types::CertificateDer;

    /// Writes a self-signed `localhost` certificate into `dir` and returns the
    /// server acceptor plus a client config trusting it.
    pub fn self_signed(dir: &Path) -> (TlsConnection, Arc<rustls::ClientConfig>) {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.join("cert.pem");
        let key_path = dir.join("key.pem");
        std::fs::write(&cert_path, certified.cert.pem()).unwrap();
        std::fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();

        let server = TlsConnection::new(&cert_path, &key_path).unwrap();

        let mut roots = rustls::RootCertStore::empty();
        roots
            .add(CertificateDer::from(certified.cert.der().to_vec()))
            .unwrap();
        let client = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        (server, Arc::new(client))
    }
}
