use crate::constants::{is_anonymous, ANONYMOUS_USER};
use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::utils::vfs_failure;
use crate::core_network::ControlConnection;
use log::{error, info, warn};

/// `PASS` outside of the login dialog.
pub async fn handle_pass_command(_conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    FtpReply::new(ReplyCode::BadSequence, "Login with USER first.").into()
}

/// Second half of the login dialog.
pub async fn complete_login(
    conn: &mut ControlConnection,
    username: &str,
    password: &str,
) -> CommandOutcome {
    if username.is_empty() || password.is_empty() {
        warn!("Login aborted: empty user name or password");
        return FtpReply::new(ReplyCode::SyntaxError, "User name and password are required.")
            .into();
    }

    // The public account always maps to one directory, however it was typed.
    let username = if is_anonymous(username) {
        ANONYMOUS_USER
    } else {
        username
    };

    let auth = conn.context.auth.clone();
    let (user, pass) = (username.to_string(), password.to_string());
    let accepted = match tokio::task::spawn_blocking(move || auth.authenticate(&user, &pass)).await
    {
        Ok(accepted) => accepted,
        Err(e) => {
            error!("Authentication task failed: {}", e);
            return FtpReply::new(ReplyCode::LocalError, "Authentication failed.").into();
        }
    };

    if !accepted {
        warn!("Failed login for {} from {}", username, conn.peer());
        return FtpReply::new(ReplyCode::NotLoggedIn, "Wrong user name or password.").into();
    }

    if let Err(e) = conn.vfs.initialize(username).await {
        return vfs_failure(e);
    }
    conn.session.log_in(username);
    info!("User {} logged in from {}", username, conn.peer());

    FtpReply::new(ReplyCode::LoggedIn, "Successfully logged in.").into()
}
