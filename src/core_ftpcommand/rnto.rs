use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;
use log::info;

/// `RNTO` outside of the rename dialog.
pub async fn handle_rnto_command(_conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    FtpReply::new(ReplyCode::BadSequence, "RNFR required first.").into()
}

pub async fn complete_rename(conn: &mut ControlConnection, from: &str, to: &str) -> CommandOutcome {
    if to.trim().is_empty() {
        return FtpReply::new(ReplyCode::SyntaxError, "No destination was provided.").into();
    }

    match conn.vfs.rename(from, to).await {
        Ok(()) => {
            info!("Renamed {} to {}", from, to);
            FtpReply::new(ReplyCode::FileActionOk, "Successfully renamed.").into()
        }
        Err(e) => vfs_failure(e),
    }
}
