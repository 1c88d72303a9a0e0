use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;

pub async fn handle_size_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.file_size(arg).await {
        Ok(size) => FtpReply::new(ReplyCode::FileStatus, size.to_string()).into(),
        Err(e) => vfs_failure(e),
    }
}
