use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::data_failure;
use crate::core_network::ControlConnection;
use crate::session::ConnectionType;
use log::debug;
use std::net::Ipv4Addr;

/// Reserves a port from the pool and tells the client where to connect.
/// Nothing is accepted until the transfer command arrives.
pub async fn handle_pasv_command(conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    let port = match conn.data.initialize_passive().await {
        Ok(port) => port,
        Err(e) => return data_failure(e),
    };
    conn.session.connection_type = ConnectionType::Passive;

    let message = passive_mode_message(conn.context.config.server.external_ip, port);
    debug!("PASV response for {}: {}", conn.peer(), message);
    FtpReply::new(ReplyCode::EnteringPassiveMode, message).into()
}

pub async fn handle_epsv_command(conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    let port = match conn.data.initialize_passive().await {
        Ok(port) => port,
        Err(e) => return data_failure(e),
    };
    conn.session.connection_type = ConnectionType::ExtendedPassive;

    FtpReply::new(
        ReplyCode::EnteringExtendedPassiveMode,
        extended_passive_mode_message(port),
    )
    .into()
}

/// Message of the `227` reply: the external address and the port, both
/// split into bytes.
pub fn passive_mode_message(external_ip: Ipv4Addr, port: u16) -> String {
    let [a, b, c, d] = external_ip.octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{})",
        a,
        b,
        c,
        d,
        port / 256,
        port % 256
    )
}

/// Message of the `229` reply; only the port is reported.
pub fn extended_passive_mode_message(port: u16) -> String {
    format!("Entering Extended Passive Mode (|||{}|)", port)
}
