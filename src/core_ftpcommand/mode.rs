use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

pub async fn handle_mode_command(_conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match arg.trim() {
        "S" => FtpReply::new(ReplyCode::Okay, "Using stream mode").into(),
        _ => FtpReply::new(ReplyCode::ParameterNotImplemented, "Not implemented yet.").into(),
    }
}
