use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::site::site_reg::handle_site_reg_command;
use crate::core_network::ControlConnection;
use log::{info, warn};

pub async fn handle_site_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let mut args = arg.trim().splitn(2, ' ');
    let subcommand = args.next().unwrap_or_default().to_ascii_uppercase();
    let sub_args = args.next().unwrap_or_default();

    match subcommand.as_str() {
        "REG" => {
            info!("Handling SITE REG command from {}", conn.peer());
            handle_site_reg_command(conn, sub_args).await
        }
        _ => {
            warn!("Unknown SITE subcommand: {}", subcommand);
            FtpReply::new(ReplyCode::CommandNotImplemented, "Command not implemented.").into()
        }
    }
}
