use crate::config::DataConfig;
use crate::core_network::error::DataError;
use crate::core_network::port_pool::PortPool;
use crate::core_network::stream::FtpStream;
use crate::core_tls::{TlsConnection, TlsError};
use log::{debug, info, warn};
use std::net::SocketAddrV4;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Active,
    Passive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChannelState {
    /// 0 while no passive port is allocated.
    pub listening_port: u16,
    pub remote_endpoint: Option<SocketAddrV4>,
    pub mode: DataMode,
    pub encryption_active: bool,
    pub buffer_size: usize,
}

/// The data channel of one control connection.
///
/// At most one socket is open at a time. Every transfer ends with
/// [`DataConnection::disconnect`], on success and on error alike.
pub struct DataConnection {
    pool: Arc<PortPool>,
    tls: Option<Arc<TlsConnection>>,
    state: DataChannelState,
    listener: Option<TcpListener>,
    stream: Option<FtpStream>,
    accept_timeout: Duration,
    min_buffer_size: usize,
    max_buffer_size: usize,
}

impl DataConnection {
    pub fn new(pool: Arc<PortPool>, tls: Option<Arc<TlsConnection>>, config: &DataConfig) -> Self {
        Self {
            pool,
            tls,
            state: DataChannelState {
                listening_port: 0,
                remote_endpoint: None,
                mode: DataMode::Passive,
                encryption_active: false,
                buffer_size: config.max_buffer_size,
            },
            listener: None,
            stream: None,
            accept_timeout: Duration::from_secs(config.accept_timeout_secs),
            min_buffer_size: config.min_buffer_size,
            max_buffer_size: config.max_buffer_size,
        }
    }

    pub fn state(&self) -> &DataChannelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Sets the transfer buffer size, clamped to the configured bounds.
    /// `0` restores the default. Returns the effective size.
    pub fn set_buffer_size(&mut self, size: usize) -> usize {
        self.state.buffer_size = if size == 0 {
            self.max_buffer_size
        } else {
            size.clamp(self.min_buffer_size, self.max_buffer_size)
        };
        self.state.buffer_size
    }

    /// Reserves a passive port. Asking again before the next transfer
    /// returns the port already held.
    pub async fn initialize_passive(&mut self) -> Result<u16, DataError> {
        if self.state.listening_port != 0 && self.listener.is_some() {
            return Ok(self.state.listening_port);
        }

        let (listener, port) = self.pool.acquire().await?;
        self.listener = Some(listener);
        self.state.listening_port = port;
        self.state.remote_endpoint = None;
        self.state.mode = DataMode::Passive;
        Ok(port)
    }

    /// Remembers where to connect for the next transfer. Any passive port
    /// held so far goes back to the pool.
    pub fn initialize_active(&mut self, endpoint: SocketAddrV4) {
        self.listener = None;
        self.state.listening_port = 0;
        self.state.remote_endpoint = Some(endpoint);
        self.state.mode = DataMode::Active;
    }

    pub async fn open_active_connection(&mut self, secure: bool) -> Result<(), DataError> {
        let endpoint = self.state.remote_endpoint.ok_or(DataError::NotInitialized)?;
        let socket = timeout(self.accept_timeout, TcpStream::connect(endpoint))
            .await
            .map_err(|_| DataError::Connect(format!("timed out connecting to {}", endpoint)))?
            .map_err(|e| DataError::Connect(e.to_string()))?;

        self.attach(socket, secure).await?;
        info!("Successfully connected to {} via ACTIVE method", endpoint);
        Ok(())
    }

    pub async fn open_passive_connection(&mut self, secure: bool) -> Result<(), DataError> {
        if self.state.listening_port == 0 {
            warn!("Client tried to open connection without initializing it.");
            return Err(DataError::NotInitialized);
        }
        let listener = self.listener.as_ref().ok_or(DataError::NotInitialized)?;
        let (socket, peer) = timeout(self.accept_timeout, listener.accept())
            .await
            .map_err(|_| DataError::Connect("timed out waiting for the client".to_string()))?
            .map_err(|e| DataError::Connect(e.to_string()))?;

        self.attach(socket, secure).await?;
        info!("Successfully accepted PASV connection: {}", peer);
        Ok(())
    }

    async fn attach(&mut self, socket: TcpStream, secure: bool) -> Result<(), DataError> {
        let stream = if secure {
            let tls = self.tls.as_ref().ok_or(TlsError::TlsNotConfigured)?;
            let tls_stream = tls.accept_tls(socket).await?;
            info!("Successfully authenticated via TLS on data channel");
            FtpStream::Tls(Box::new(tls_stream))
        } else {
            FtpStream::Plain(socket)
        };
        self.state.encryption_active = secure;
        self.stream = Some(stream);
        Ok(())
    }

    /// Copies all of `source` into the channel and flushes.
    pub async fn send_bytes<R>(&mut self, source: R) -> Result<u64, DataError>
    where
        R: AsyncRead + Unpin,
    {
        let buffer_size = self.state.buffer_size;
        let stream = self.stream.as_mut().ok_or(DataError::NotInitialized)?;
        let mut reader = BufReader::with_capacity(buffer_size, source);
        let sent = tokio::io::copy_buf(&mut reader, stream)
            .await
            .map_err(|e| DataError::Transfer(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| DataError::Transfer(e.to_string()))?;
        info!("Successfully SENT a total of {} bytes", sent);
        Ok(sent)
    }

    /// Copies the channel into `destination` until the client closes its
    /// side.
    pub async fn receive_bytes<W>(&mut self, destination: &mut W) -> Result<u64, DataError>
    where
        W: AsyncWrite + Unpin,
    {
        let buffer_size = self.state.buffer_size;
        let stream = self.stream.as_mut().ok_or(DataError::NotInitialized)?;
        let mut reader = BufReader::with_capacity(buffer_size, stream);
        let received = tokio::io::copy_buf(&mut reader, destination)
            .await
            .map_err(|e| DataError::Transfer(e.to_string()))?;
        destination
            .flush()
            .await
            .map_err(|e| DataError::Transfer(e.to_string()))?;
        info!("Successfully RECEIVED a total of {} bytes", received);
        Ok(received)
    }

    /// Closes the socket, releases the passive port and forgets it.
    pub async fn disconnect(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("Data stream shutdown failed: {}", e);
            }
        }
        self.listener = None;
        self.state.listening_port = 0;
        self.state.encryption_active = false;
    }
}
