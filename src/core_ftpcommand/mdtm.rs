use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;

pub async fn handle_mdtm_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.last_modified(arg).await {
        Ok(time) => FtpReply::new(ReplyCode::FileStatus, time).into(),
        Err(e) => vfs_failure(e),
    }
}
