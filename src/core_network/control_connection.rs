use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::handlers::{continue_dialog, dispatch};
use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::data_connection::DataConnection;
use crate::core_network::error::DataError;
use crate::core_network::stream::FtpStream;
use crate::core_tls::TlsError;
use crate::core_vfs::VirtualFileSystem;
use crate::server::ServerContext;
use crate::session::{ClientSession, ConnectionType};
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// The protocol engine of one client.
///
/// Reads one command line at a time, runs it to completion and writes the
/// reply. Two-step dialogs (`USER`/`PASS`, `RNFR`/`RNTO`) read their second
/// line right here, so nothing else can slip in between.
///
/// The session's cancellation token is watched at every blocking read and
/// around every transfer; once it fires, the connection is disposed without
/// waiting for the client.
pub struct ControlConnection {
    stream: BufReader<FtpStream>,
    pub(crate) session: ClientSession,
    pub(crate) data: DataConnection,
    pub(crate) vfs: VirtualFileSystem,
    pub(crate) context: ServerContext,
    peer: SocketAddr,
    token: CancellationToken,
}

impl ControlConnection {
    pub fn new(
        socket: TcpStream,
        peer: SocketAddr,
        context: ServerContext,
        token: CancellationToken,
    ) -> Self {
        let data = DataConnection::new(
            context.ports.clone(),
            context.tls.clone(),
            &context.config.data,
        );
        let vfs = VirtualFileSystem::new(context.config.server.base_dir.clone());

        Self {
            stream: BufReader::new(FtpStream::Plain(socket)),
            session: ClientSession::new(),
            data,
            vfs,
            context,
            peer,
            token,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Greets the client and runs the command loop until the client leaves,
    /// a command ends the session, or the server cancels it.
    pub async fn run(mut self) {
        info!("New connection from {}", self.peer);
        let greeting = FtpReply::new(ReplyCode::ServiceReady, "Service is ready.");
        if self.send_reply(&greeting).await.is_ok() {
            while let Some(line) = self.read_command().await {
                if line.trim().is_empty() {
                    continue;
                }
                if !self.execute(&line).await {
                    break;
                }
            }
        }
        self.dispose().await;
    }

    /// Reads one line. `None` means the session is over: EOF, an empty
    /// line, a broken transport or cancellation.
    ///
    /// Lines longer than `MAX_COMMAND_LINE` are answered with `500` and
    /// skipped.
    pub(crate) async fn read_command(&mut self) -> Option<String> {
        let token = self.token.clone();
        loop {
            let read = tokio::select! {
                _ = token.cancelled() => {
                    info!("Session {} cancelled by server shutdown", self.peer);
                    return None;
                }
                read = read_raw_line(&mut self.stream) => read,
            };

            let buffer = match read {
                Ok(RawLine::Line(buffer)) => buffer,
                Ok(RawLine::TooLong) => {
                    warn!("Client {} sent a command line that is too long", self.peer);
                    let reply =
                        FtpReply::new(ReplyCode::CommandUnrecognized, "Command line too long.");
                    if self.send_reply(&reply).await.is_err() {
                        return None;
                    }
                    continue;
                }
                Ok(RawLine::Eof) => {
                    info!("Client {} disconnected", self.peer);
                    return None;
                }
                Err(e) => {
                    warn!("Failed to read from {}: {}", self.peer, e);
                    return None;
                }
            };

            let line = self.session.encoding.decode(&buffer);
            let line = line.trim_end_matches(|c| c == '\r' || c == '\n').to_string();
            if line.is_empty() {
                info!("Client {} sent an empty line, closing", self.peer);
                return None;
            }
            debug!("[{}] {}", self.peer, mask_password(&line));
            return Some(line);
        }
    }

    pub(crate) async fn send_reply(&mut self, reply: &FtpReply) -> io::Result<()> {
        let bytes = self.session.encoding.encode(&reply.to_line());
        let writer = self.stream.get_mut();
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        debug!("[{}] -> {}", self.peer, reply);
        Ok(())
    }

    /// Runs one command line, including the second line of a dialog.
    /// Returns `false` once the session must end.
    async fn execute(&mut self, line: &str) -> bool {
        let mut outcome = dispatch(self, line).await;
        loop {
            match outcome {
                CommandOutcome::Reply(reply) => return self.send_reply(&reply).await.is_ok(),
                CommandOutcome::Silent => return true,
                CommandOutcome::NeedsFollowup(reply, followup) => {
                    if self.send_reply(&reply).await.is_err() {
                        return false;
                    }
                    let next = match self.read_command().await {
                        Some(next) => next,
                        None => return false,
                    };
                    outcome = continue_dialog(self, followup, &next).await;
                }
                CommandOutcome::Fatal(reply) => {
                    error!("Closing session {}: {}", self.peer, reply);
                    let _ = self.send_reply(&reply).await;
                    return false;
                }
                CommandOutcome::Close(reply) => {
                    let _ = self.send_reply(&reply).await;
                    return false;
                }
                CommandOutcome::Disconnect => return false,
            }
        }
    }

    /// Upgrades the control channel in place. The caller has already sent
    /// the plaintext go-ahead.
    pub(crate) async fn enable_control_tls(&mut self) -> Result<(), TlsError> {
        let tls = self.context.tls.clone().ok_or(TlsError::TlsNotConfigured)?;
        if self.control_is_tls() {
            return Err(TlsError::TlsConfigError(
                "control channel is already secured".into(),
            ));
        }

        // Bytes the client pipelined before the handshake would be plaintext.
        if !self.stream.buffer().is_empty() {
            warn!("Client {} sent data before the TLS handshake", self.peer);
        }

        let plain = std::mem::replace(self.stream.get_mut(), FtpStream::Closed);
        let socket = plain
            .into_plain()
            .ok_or_else(|| TlsError::TlsConfigError("control channel is closed".into()))?;
        let token = self.token.clone();
        let tls_stream = tokio::select! {
            _ = token.cancelled() => {
                return Err(TlsError::TlsHandshakeError("server is shutting down".into()));
            }
            accepted = tls.accept_tls(socket) => accepted?,
        };
        self.stream = BufReader::new(FtpStream::Tls(Box::new(tls_stream)));
        self.session.encryption.control_tls = true;
        info!("Successfully authenticated via TLS: {}", self.peer);
        Ok(())
    }

    pub(crate) fn control_is_tls(&self) -> bool {
        self.stream.get_ref().is_tls()
    }

    /// Sends `125` if a channel is already open, otherwise `150`, then
    /// connects according to the session's connection type.
    pub(crate) async fn open_data_connection(&mut self) -> Result<(), DataError> {
        if self.data.is_open() {
            self.send_reply(&FtpReply::new(
                ReplyCode::TransferStarting,
                "Transfer is starting.",
            ))
            .await
            .map_err(|e| DataError::Transfer(e.to_string()))?;
            return Ok(());
        }

        self.send_reply(&FtpReply::new(
            ReplyCode::AboutToOpenDataConnection,
            "Trying to open data connection.",
        ))
        .await
        .map_err(|e| DataError::Transfer(e.to_string()))?;

        let secure = self.session.encryption.data_tls;
        let token = self.token.clone();
        let open = async {
            match self.session.connection_type {
                ConnectionType::Active => self.data.open_active_connection(secure).await,
                ConnectionType::Passive | ConnectionType::ExtendedPassive => {
                    self.data.open_passive_connection(secure).await
                }
                ConnectionType::None => Err(DataError::NotInitialized),
            }
        };
        let opened = tokio::select! {
            _ = token.cancelled() => Err(DataError::Connect("server is shutting down".into())),
            result = open => result,
        };
        if opened.is_ok() {
            debug!("[{}] data channel open: {:?}", self.peer, self.data.state());
        }
        opened
    }

    /// Releases the data channel and closes the control socket.
    async fn dispose(&mut self) {
        self.data.disconnect().await;
        let mut stream = std::mem::replace(self.stream.get_mut(), FtpStream::Closed);
        if let Err(e) = stream.shutdown().await {
            debug!("Control stream shutdown failed for {}: {}", self.peer, e);
        }
        info!(
            "Connection closed for {} ({})",
            self.peer,
            self.session.username.as_deref().unwrap_or("not logged in")
        );
    }
}

/// Runs a transfer unless the session gets cancelled first.
pub(crate) async fn cancellable<F, T>(token: &CancellationToken, transfer: F) -> Result<T, DataError>
where
    F: std::future::Future<Output = Result<T, DataError>>,
{
    tokio::select! {
        _ = token.cancelled() => Err(DataError::Transfer("server is shutting down".into())),
        result = transfer => result,
    }
}

enum RawLine {
    Line(Vec<u8>),
    TooLong,
    Eof,
}

/// Reads up to the next `\n` without buffering more than
/// `MAX_COMMAND_LINE` bytes. The rest of an oversized line is discarded.
async fn read_raw_line<R>(stream: &mut R) -> io::Result<RawLine>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_COMMAND_LINE as u64;
    let mut buffer = Vec::new();
    if (&mut *stream).take(limit).read_until(b'\n', &mut buffer).await? == 0 {
        return Ok(RawLine::Eof);
    }
    if buffer.ends_with(b"\n") || buffer.len() < MAX_COMMAND_LINE {
        return Ok(RawLine::Line(buffer));
    }

    loop {
        buffer.clear();
        let n = (&mut *stream).take(limit).read_until(b'\n', &mut buffer).await?;
        if n == 0 || buffer.ends_with(b"\n") {
            return Ok(RawLine::TooLong);
        }
    }
}

fn mask_password(line: &str) -> &str {
    if line.starts_with("PASS ") {
        "PASS ****"
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_masked() {
        assert_eq!(mask_password("PASS hunter2"), "PASS ****");
        assert_eq!(mask_password("USER bob"), "USER bob");
    }

    #[tokio::test]
    async fn test_oversized_line_is_skipped_up_to_newline() {
        let mut input = vec![b'A'; MAX_COMMAND_LINE * 3];
        input.extend_from_slice(b"\r\nNOOP\r\n");
        let mut reader = &input[..];

        assert!(matches!(read_raw_line(&mut reader).await.unwrap(), RawLine::TooLong));
        match read_raw_line(&mut reader).await.unwrap() {
            RawLine::Line(line) => assert_eq!(line, b"NOOP\r\n"),
            _ => panic!("expected the next command"),
        }
        assert!(matches!(read_raw_line(&mut reader).await.unwrap(), RawLine::Eof));
    }

    #[tokio::test]
    async fn test_line_at_the_limit_is_accepted() {
        let mut input = vec![b'A'; MAX_COMMAND_LINE - 2];
        input.extend_from_slice(b"\r\n");
        let mut reader = &input[..];

        match read_raw_line(&mut reader).await.unwrap() {
            RawLine::Line(line) => assert_eq!(line.len(), MAX_COMMAND_LINE),
            _ => panic!("expected a full line"),
        }
    }
}
