use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::quote_path;
use crate::core_network::ControlConnection;

pub async fn handle_pwd_command(conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    let message = format!(
        "{} is current directory.",
        quote_path(conn.vfs.working_directory())
    );
    FtpReply::new(ReplyCode::PathCreated, message).into()
}
