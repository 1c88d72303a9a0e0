use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;
use log::{error, warn};

/// `SITE REG <user> <password>`: creates an account with the default quota.
pub async fn handle_site_reg_command(conn: &mut ControlConnection, args: &str) -> CommandOutcome {
    let words: Vec<&str> = args.split_whitespace().collect();
    let (username, password) = match words.as_slice() {
        [username, password] => (username.to_string(), password.to_string()),
        _ => {
            warn!("SITE REG needs exactly a user name and a password");
            return FtpReply::new(ReplyCode::SyntaxError, "Usage: SITE REG <user> <password>")
                .into();
        }
    };

    let registry = conn.context.registry.clone();
    let name = username.clone();
    let result = tokio::task::spawn_blocking(move || registry.register(&name, &password)).await;

    match result {
        Ok(Ok(())) => FtpReply::new(
            ReplyCode::Okay,
            format!("User {} successfully registered.", username),
        )
        .into(),
        Ok(Err(e)) => {
            warn!("Registration of {} refused: {}", username, e);
            e.to_reply().into()
        }
        Err(e) => {
            error!("Registration task failed: {}", e);
            FtpReply::new(ReplyCode::LocalError, "Registration failed.").into()
        }
    }
}
