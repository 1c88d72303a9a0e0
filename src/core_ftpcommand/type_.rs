use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

/// Transfers are always byte for byte; `A` and `I` are both accepted.
pub async fn handle_type_command(_conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match arg.trim() {
        "A" => FtpReply::new(ReplyCode::Okay, "Now using ascii type for transferring data.").into(),
        "I" => FtpReply::new(ReplyCode::Okay, "Now using binary type for transferring data.").into(),
        _ => FtpReply::new(ReplyCode::ParameterNotImplemented, "Unknown type").into(),
    }
}
