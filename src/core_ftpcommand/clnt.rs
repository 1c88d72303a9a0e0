use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use log::info;

pub async fn handle_clnt_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let name = arg.trim();
    info!("Client {} is using {}", conn.peer(), name);
    conn.session.client_name = Some(name.to_string());
    FtpReply::new(ReplyCode::Okay, "Noted.").into()
}
