use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

pub async fn handle_noop_command(_conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    FtpReply::new(ReplyCode::Okay, "Connection is ok.").into()
}
