use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use crate::session::ConnectionType;
use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Handles the PORT (Active Mode) FTP command. The connection itself is
/// made when a transfer starts.
pub async fn handle_port_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let endpoint = match parse_port_argument(arg) {
        Some(endpoint) => endpoint,
        None => {
            warn!("Invalid PORT argument from {}: {}", conn.peer(), arg);
            return FtpReply::new(
                ReplyCode::SyntaxError,
                "Syntax error in parameters or arguments.",
            )
            .into();
        }
    };

    info!("Received PORT command with endpoint {}", endpoint);
    conn.data.initialize_active(endpoint);
    conn.session.connection_type = ConnectionType::Active;
    FtpReply::new(ReplyCode::Okay, "Command okay.").into()
}

/// Decodes the `h1,h2,h3,h4,p1,p2` argument of `PORT`.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddrV4> {
    let bytes: Vec<u8> = arg
        .trim()
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if bytes.len() != 6 {
        return None;
    }

    let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
    let port = (bytes[4] as u16) << 8 | bytes[5] as u16;
    Some(SocketAddrV4::new(ip, port))
}
