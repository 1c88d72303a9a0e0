use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;
use log::info;

pub async fn handle_dele_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.delete(arg).await {
        Ok(()) => {
            info!("Deleted {}", arg);
            FtpReply::new(ReplyCode::FileActionOk, "Successfully deleted.").into()
        }
        Err(e) => vfs_failure(e),
    }
}
