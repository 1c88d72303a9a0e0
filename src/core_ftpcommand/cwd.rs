use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;
use log::debug;

/// Handles the CWD FTP command. A missing directory is created on the way.
pub async fn handle_cwd_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.change_working_directory(arg).await {
        Ok(dir) => {
            debug!("Working directory is now {}", dir);
            FtpReply::new(
                ReplyCode::FileActionOk,
                format!("Working directory changed to {}", dir),
            )
            .into()
        }
        Err(e) => vfs_failure(e),
    }
}
