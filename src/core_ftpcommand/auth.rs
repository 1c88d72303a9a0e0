use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use crate::core_tls::TlsError;
use log::error;

/// Handles the AUTH FTP command.
///
/// The go-ahead is written in plaintext, then the control channel is
/// wrapped in TLS in place. A failed handshake leaves nothing usable to
/// reply on, so the session ends silently.
pub async fn handle_auth_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let mechanism = arg.trim();
    if !mechanism.eq_ignore_ascii_case("TLS") && !mechanism.eq_ignore_ascii_case("SSL") {
        return FtpReply::new(
            ReplyCode::ParameterNotImplemented,
            format!("Unsupported security mechanism: {}", mechanism),
        )
        .into();
    }
    if conn.context.tls.is_none() {
        return TlsError::TlsNotConfigured.to_reply().into();
    }
    if conn.control_is_tls() {
        return FtpReply::new(ReplyCode::BadSequence, "Control channel is already secured.").into();
    }

    let ready = FtpReply::new(ReplyCode::SecurityExchangeDone, "Service is ready.");
    if conn.send_reply(&ready).await.is_err() {
        return CommandOutcome::Disconnect;
    }

    match conn.enable_control_tls().await {
        Ok(()) => CommandOutcome::Silent,
        Err(e) => {
            error!("TLS handshake failed for {}: {}", conn.peer(), e);
            CommandOutcome::Disconnect
        }
    }
}
