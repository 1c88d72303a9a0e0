use crate::config::Config;
use crate::core_auth::{AuthProvider, PasswdDatabase, UserRegistry};
use crate::core_network::port_pool::PortPool;
use crate::core_quota::{DiskQuota, QuotaGuard};
use crate::core_tls::TlsConnection;
use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

/// Collaborators shared by every session, wired once at startup.
#[derive(Clone)]
pub struct ServerContext {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthProvider>,
    pub registry: Arc<dyn UserRegistry>,
    pub quota: QuotaGuard,
    pub tls: Option<Arc<TlsConnection>>,
    pub ports: Arc<PortPool>,
}

impl ServerContext {
    /// Builds the default collaborators: the passwd-file user database, the
    /// on-disk quota, the TLS acceptor (if enabled) and the port pool.
    pub fn from_config(config: Config) -> Result<Self> {
        let database = Arc::new(
            PasswdDatabase::load(
                &config.server.passwd_file,
                config.server.allow_anonymous,
                config.quota.default_total_bytes,
            )
            .with_context(|| {
                format!("Failed to load user database {:?}", config.server.passwd_file)
            })?,
        );
        info!("Loaded {} registered users", database.user_count());

        let quota = QuotaGuard::new(Arc::new(DiskQuota::new(
            config.server.base_dir.clone(),
            config.quota.default_total_bytes,
            database.clone(),
        )));

        let tls = TlsConnection::from_config(&config.tls)
            .context("Failed to set up TLS")?
            .map(Arc::new);
        match &tls {
            Some(_) => info!("TLS is available for AUTH and PROT P"),
            None => warn!("TLS is disabled; AUTH and PROT P will be refused"),
        }

        let ports = Arc::new(PortPool::from_config(&config.data));
        let (min_port, max_port) = ports.range();
        info!("Passive ports are allocated from [{}, {})", min_port, max_port);

        Ok(Self {
            config: Arc::new(config),
            auth: database.clone(),
            registry: database,
            quota,
            tls,
            ports,
        })
    }
}
