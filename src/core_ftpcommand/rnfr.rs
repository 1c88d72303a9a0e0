use crate::core_ftpcommand::outcome::{CommandOutcome, Followup};
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;

/// Handles the RNFR FTP command. The source must exist; the next line must
/// be `RNTO`.
pub async fn handle_rnfr_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    if let Err(e) = conn.vfs.entry_info(Some(arg)).await {
        return vfs_failure(e);
    }

    CommandOutcome::NeedsFollowup(
        FtpReply::new(ReplyCode::FileActionPendingInfo, "Waiting for RNTO command."),
        Followup::RenameTo {
            from: arg.to_string(),
        },
    )
}
