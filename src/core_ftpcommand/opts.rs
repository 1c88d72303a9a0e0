use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use crate::session::TextEncoding;
use log::info;

/// Only `OPTS UTF8 ON|OFF` is understood.
pub async fn handle_opts_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    let option = arg.trim().to_ascii_uppercase();
    let encoding = match option.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["UTF8", "ON"] => TextEncoding::Utf8,
        ["UTF8", "OFF"] => TextEncoding::Ascii,
        _ => {
            return FtpReply::new(ReplyCode::SyntaxError, format!("Unknown option: {}", arg)).into()
        }
    };

    conn.session.encoding = encoding;
    info!("Client {} switched encoding to {:?}", conn.peer(), encoding);
    let message = match encoding {
        TextEncoding::Utf8 => "UTF8 mode enabled.",
        TextEncoding::Ascii => "UTF8 mode disabled.",
    };
    FtpReply::new(ReplyCode::Okay, message).into()
}
