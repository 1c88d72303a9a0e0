use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

/// Sets the data buffer size. Out-of-range values are clamped and `0`
/// restores the default; the reply carries the size actually used.
pub async fn handle_pbsz_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let requested = match arg.trim().parse::<usize>() {
        Ok(size) => size,
        Err(_) => {
            return FtpReply::new(ReplyCode::SyntaxError, "Buffer size must be a number.").into()
        }
    };

    let effective = conn.data.set_buffer_size(requested);
    FtpReply::new(ReplyCode::Okay, format!("PBSZ={}", effective)).into()
}
