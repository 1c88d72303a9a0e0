use crate::constants::is_anonymous;
use crate::core_ftpcommand::outcome::{CommandOutcome, Followup};
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use log::info;

/// Handles the USER FTP command.
///
/// Any earlier login is dropped first. The reply asks for the password and
/// the next line must be `PASS`; see `continue_dialog`.
pub async fn handle_user_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let username = arg.trim();
    info!("Received USER command with username: {}", username);

    conn.session.log_out();
    conn.vfs.reset();

    let message = if is_anonymous(username) {
        "Anonymous login okay, send your email address as password."
    } else {
        "Waiting for password."
    };

    CommandOutcome::NeedsFollowup(
        FtpReply::new(ReplyCode::NeedPassword, message),
        Followup::Password {
            username: username.to_string(),
        },
    )
}
