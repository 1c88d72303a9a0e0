use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::control_connection::{cancellable, ControlConnection};
use crate::core_network::DataError;
use crate::core_vfs::VfsError;
use log::{error, warn};
use tokio::io::AsyncRead;

/// Turns a filesystem failure into the reply for the client. Running out of
/// storage ends the session.
pub fn vfs_failure(err: VfsError) -> CommandOutcome {
    let reply = err.to_reply();
    if err.is_fatal() {
        error!("{}", err);
        CommandOutcome::Fatal(reply)
    } else {
        warn!("{}", err);
        CommandOutcome::Reply(reply)
    }
}

pub fn data_failure(err: DataError) -> CommandOutcome {
    let reply = err.to_reply();
    if err.is_fatal() {
        error!("{}", err);
        CommandOutcome::Fatal(reply)
    } else {
        warn!("{}", err);
        CommandOutcome::Reply(reply)
    }
}

/// Opens the data channel, sends everything `source` yields and closes the
/// channel again.
pub async fn send_over_data_channel<R>(
    conn: &mut ControlConnection,
    source: R,
    done: &str,
) -> CommandOutcome
where
    R: AsyncRead + Unpin,
{
    if let Err(e) = conn.open_data_connection().await {
        conn.data.disconnect().await;
        return data_failure(e);
    }

    let token = conn.token().clone();
    let result = cancellable(&token, conn.data.send_bytes(source)).await;
    conn.data.disconnect().await;

    match result {
        Ok(_) => FtpReply::new(ReplyCode::SuccessClosingDataConnection, done).into(),
        Err(e) => data_failure(e),
    }
}

/// Quotes a path for a `257` reply; embedded quotes are doubled.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}
