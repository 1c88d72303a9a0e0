use crate::core_network::control_connection::ControlConnection;
use crate::server::ServerContext;
use anyhow::{Context, Result};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Accepts clients and keeps track of their sessions for shutdown.
///
/// Every session gets a child of `session_token`: cancelling the parent
/// disposes all of them at once.
#[derive(Clone)]
pub struct FtpServer {
    context: ServerContext,
    accept_token: CancellationToken,
    session_token: CancellationToken,
    connections: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl FtpServer {
    pub fn new(context: ServerContext) -> Self {
        Self {
            context,
            accept_token: CancellationToken::new(),
            session_token: CancellationToken::new(),
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let address = SocketAddr::from((
            self.context.config.server.listen_address,
            self.context.config.server.listen_port,
        ));
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind control listener on {}", address))?;
        info!("Server listening on {}", address);
        Ok(listener)
    }

    /// Accepts clients until [`FtpServer::stop`] is called.
    pub async fn run(&self, listener: TcpListener) -> Result<()> {
        loop {
            let accepted = tokio::select! {
                _ = self.accept_token.cancelled() => break,
                accepted = listener.accept() => accepted,
            };

            let (socket, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            if !self.start_session(socket, peer).await {
                break;
            }
        }

        info!("Stopped accepting new connections");
        Ok(())
    }

    /// Spawns and registers the session of an accepted client. Returns
    /// `false` (and drops the socket) once [`FtpServer::stop`] has begun.
    ///
    /// `stop` cancels accepting before it takes the registry lock, so a
    /// session registered under that lock is always seen by its drain.
    pub(crate) async fn start_session(&self, socket: TcpStream, peer: SocketAddr) -> bool {
        let mut connections = self.connections.lock().await;
        if self.accept_token.is_cancelled() {
            info!("Refusing {}: server is shutting down", peer);
            return false;
        }

        let connection = ControlConnection::new(
            socket,
            peer,
            self.context.clone(),
            self.session_token.child_token(),
        );
        connections.retain(|handle| !handle.is_finished());
        connections.push(tokio::spawn(connection.run()));
        true
    }

    pub async fn active_sessions(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Stops accepting, then either waits for every session to end on its
    /// own (`wait_for_users`) or cancels them all and waits for disposal.
    pub async fn stop(&self, wait_for_users: bool) {
        self.accept_token.cancel();
        if !wait_for_users {
            info!("Forcing every session to close");
            self.session_token.cancel();
        } else {
            info!("Waiting for users to disconnect");
        }

        let handles: Vec<JoinHandle<()>> = {
            let mut connections = self.connections.lock().await;
            connections.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Session task failed: {}", e);
            }
        }
        info!("All sessions are closed");
    }

    /// Cancels every live session without waiting. Used when a graceful
    /// stop is already in progress and the operator asks again.
    pub fn force_close(&self) {
        self.accept_token.cancel();
        self.session_token.cancel();
    }
}
