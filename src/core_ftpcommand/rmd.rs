use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;
use log::info;

/// Removes a directory with everything below it. The user's root is
/// refused.
pub async fn handle_rmd_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.delete(arg).await {
        Ok(()) => {
            info!("Removed {}", arg);
            FtpReply::new(ReplyCode::FileActionOk, "Successfully deleted.").into()
        }
        Err(e) => vfs_failure(e),
    }
}
