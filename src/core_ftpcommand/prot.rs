use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use crate::core_tls::TlsError;
use log::info;

/// `PROT P` / `PROT C`. Takes effect on the next data channel opened.
pub async fn handle_prot_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match arg.trim() {
        "P" => {
            if conn.context.tls.is_none() {
                return TlsError::TlsNotConfigured.to_reply().into();
            }
            conn.session.encryption.data_tls = true;
            info!("Enabled encryption for data channel: {}", conn.peer());
            FtpReply::new(ReplyCode::Okay, "Data channel protection level set to Private.").into()
        }
        "C" => {
            conn.session.encryption.data_tls = false;
            info!("Disabled encryption for data channel: {}", conn.peer());
            FtpReply::new(ReplyCode::Okay, "Data channel protection level set to Clear.").into()
        }
        other => FtpReply::new(
            ReplyCode::ParameterNotImplemented,
            format!("Protection level {} is not supported.", other),
        )
        .into(),
    }
}
