use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::{quote_path, vfs_failure};
use crate::core_network::ControlConnection;
use log::info;

pub async fn handle_mkd_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    match conn.vfs.create_directory(arg).await {
        Ok(path) => {
            info!("Directory created: {}", path);
            FtpReply::new(ReplyCode::PathCreated, format!("{} created.", quote_path(&path))).into()
        }
        Err(e) => vfs_failure(e),
    }
}
