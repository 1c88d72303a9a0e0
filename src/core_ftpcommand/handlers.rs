use crate::core_ftpcommand::ftpcommand::{split_command_line, FtpCommand};
use crate::core_ftpcommand::outcome::{CommandOutcome, Followup};
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_ftpcommand::{
    auth, cdup, clnt, cwd, dele, feat, list, mdtm, mkd, mlst, mode, noop, opts, pass, pbsz, prot,
    pwd, quit, retr, rmd, rnfr, rnto, site, size, stor, syst, type_, user,
};
use crate::core_network::{pasv, port, ControlConnection};
use log::warn;

/// Runs one command line and returns what the connection should do next.
///
/// Unknown verbs, missing logins and missing mandatory parameters are all
/// answered here, before any handler runs.
pub async fn dispatch(conn: &mut ControlConnection, line: &str) -> CommandOutcome {
    let (verb, arg) = split_command_line(line);

    let command = match FtpCommand::from_verb(verb) {
        Some(command) => command,
        None => {
            warn!("Command not recognized: {}", verb);
            return FtpReply::new(
                ReplyCode::CommandUnrecognized,
                format!("Command {} not recognized.", verb),
            )
            .into();
        }
    };

    if !conn.session.authenticated && !command.allowed_before_login() {
        return FtpReply::new(ReplyCode::NotLoggedIn, "Not logged in.").into();
    }

    if command.requires_argument() && arg.trim().is_empty() {
        return FtpReply::new(ReplyCode::SyntaxError, "Syntax error in parameters or arguments.")
            .into();
    }

    match command {
        FtpCommand::USER => user::handle_user_command(conn, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(conn, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(conn, arg).await,
        FtpCommand::PORT => port::handle_port_command(conn, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(conn, arg).await,
        FtpCommand::EPSV => pasv::handle_epsv_command(conn, arg).await,
        FtpCommand::TYPE => type_::handle_type_command(conn, arg).await,
        FtpCommand::MODE => mode::handle_mode_command(conn, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(conn, arg).await,
        FtpCommand::CDUP => cdup::handle_cdup_command(conn, arg).await,
        FtpCommand::PWD => pwd::handle_pwd_command(conn, arg).await,
        FtpCommand::MKD => mkd::handle_mkd_command(conn, arg).await,
        FtpCommand::RMD => rmd::handle_rmd_command(conn, arg).await,
        FtpCommand::DELE => dele::handle_dele_command(conn, arg).await,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(conn, arg).await,
        FtpCommand::RNTO => rnto::handle_rnto_command(conn, arg).await,
        FtpCommand::LIST => list::handle_list_command(conn, arg).await,
        FtpCommand::NLST => list::handle_nlst_command(conn, arg).await,
        FtpCommand::MLSD => list::handle_mlsd_command(conn, arg).await,
        FtpCommand::MLST => mlst::handle_mlst_command(conn, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(conn, arg).await,
        FtpCommand::STOR => stor::handle_stor_command(conn, arg).await,
        FtpCommand::SIZE => size::handle_size_command(conn, arg).await,
        FtpCommand::MDTM => mdtm::handle_mdtm_command(conn, arg).await,
        FtpCommand::FEAT => feat::handle_feat_command(conn, arg).await,
        FtpCommand::OPTS => opts::handle_opts_command(conn, arg).await,
        FtpCommand::AUTH => auth::handle_auth_command(conn, arg).await,
        FtpCommand::PROT => prot::handle_prot_command(conn, arg).await,
        FtpCommand::PBSZ => pbsz::handle_pbsz_command(conn, arg).await,
        FtpCommand::SYST => syst::handle_syst_command(conn, arg).await,
        FtpCommand::NOOP => noop::handle_noop_command(conn, arg).await,
        FtpCommand::CLNT => clnt::handle_clnt_command(conn, arg).await,
        FtpCommand::SITE => site::handler::handle_site_command(conn, arg).await,
    }
}

/// Runs the line that follows `USER` or `RNFR`. Any other verb aborts the
/// dialog and is not executed.
pub async fn continue_dialog(
    conn: &mut ControlConnection,
    followup: Followup,
    line: &str,
) -> CommandOutcome {
    let (verb, arg) = split_command_line(line);

    match followup {
        Followup::Password { username } => {
            if verb != "PASS" {
                warn!("Expected PASS after USER {}, got {}", username, verb);
                return FtpReply::new(
                    ReplyCode::SyntaxError,
                    "USER is always followed by PASS command.",
                )
                .into();
            }
            pass::complete_login(conn, &username, arg).await
        }
        Followup::RenameTo { from } => {
            if verb != "RNTO" {
                warn!("Expected RNTO after RNFR {}, got {}", from, verb);
                return FtpReply::new(
                    ReplyCode::BadSequence,
                    "RNFR is always followed by RNTO command. Rename abandoned.",
                )
                .into();
            }
            rnto::complete_rename(conn, &from, arg).await
        }
    }
}
