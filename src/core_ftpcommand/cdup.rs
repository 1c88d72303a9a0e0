use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

/// Moves one segment up; a no-op at `/`.
pub async fn handle_cdup_command(conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    conn.vfs.move_up();
    FtpReply::new(ReplyCode::Okay, "Successfully moved up.").into()
}
