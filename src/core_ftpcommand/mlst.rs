use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;

/// Facts about one entry, sent on the control channel.
pub async fn handle_mlst_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let target = if arg.trim().is_empty() { None } else { Some(arg) };
    match conn.vfs.entry_info(target).await {
        Ok(entry) => FtpReply::multiline(
            ReplyCode::FileActionOk,
            format!("Listing {}", target.unwrap_or(conn.vfs.working_directory())),
            vec![entry.to_mlsd_line()],
        )
        .into(),
        Err(e) => vfs_failure(e),
    }
}
