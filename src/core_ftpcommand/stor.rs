use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::{data_failure, vfs_failure};
use crate::core_network::control_connection::cancellable;
use crate::core_network::ControlConnection;
use crate::core_vfs::VfsError;
use log::info;
use tokio::fs::File;

/// Handles the STOR FTP command.
///
/// The path and the quota are checked before the data channel is opened: an
/// account that is already full gets `552` and the session ends. The
/// destination is only created (or truncated) once the channel is up, so a
/// failed open leaves an existing file untouched.
pub async fn handle_stor_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let local = match conn.vfs.local_path(arg) {
        Ok(local) => local,
        Err(e) => return vfs_failure(e),
    };
    if let Err(e) = conn.context.quota.ensure_space(&conn.vfs).await {
        return vfs_failure(e);
    }

    if let Err(e) = conn.open_data_connection().await {
        conn.data.disconnect().await;
        return data_failure(e);
    }

    let mut file = match create_destination(conn, arg, &local).await {
        Ok(file) => file,
        Err(e) => {
            conn.data.disconnect().await;
            return vfs_failure(e);
        }
    };

    let token = conn.token().clone();
    let result = cancellable(&token, conn.data.receive_bytes(&mut file)).await;
    conn.data.disconnect().await;

    match result {
        Ok(received) => {
            info!("Stored {} ({} bytes)", arg, received);
            FtpReply::new(ReplyCode::SuccessClosingDataConnection, "Transfer complete.").into()
        }
        Err(e) => data_failure(e),
    }
}

async fn create_destination(
    conn: &ControlConnection,
    arg: &str,
    local: &std::path::Path,
) -> Result<File, VfsError> {
    let quota = &conn.context.quota;
    if tokio::fs::try_exists(local).await? {
        quota.create_new_file_or_overwrite(&conn.vfs, arg).await
    } else {
        quota.create_new_file(&conn.vfs, arg).await
    }
}
