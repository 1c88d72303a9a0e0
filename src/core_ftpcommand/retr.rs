use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::utils::{send_over_data_channel, vfs_failure};
use crate::core_network::ControlConnection;
use log::info;

/// Handles the RETR (Retrieve) FTP command.
///
/// The file is opened before the data channel, so a missing file is
/// reported without touching the data connection.
pub async fn handle_retr_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let file = match conn.vfs.open_file(arg).await {
        Ok(file) => file,
        Err(e) => return vfs_failure(e),
    };

    info!("Sending file: {}", arg);
    send_over_data_channel(conn, file, "Transfer complete.").await
}
