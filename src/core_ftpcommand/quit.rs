use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use log::info;

pub async fn handle_quit_command(conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    info!("Client {} sent QUIT", conn.peer());
    CommandOutcome::Close(FtpReply::new(
        ReplyCode::ClosingControlConnection,
        "Quitting...",
    ))
}
