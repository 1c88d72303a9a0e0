use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::reply::{FtpReply, ReplyCode};
use crate::core_network::ControlConnection;

const FEATURES: &[&str] = &[
    "AUTH TLS",
    "PBSZ",
    "PROT",
    "UTF8",
    "EPSV",
    "SIZE",
    "MDTM",
    "CLNT",
    "MLST Type*;Size*;Modify*;Perm*;",
];

pub async fn handle_feat_command(_conn: &mut ControlConnection, _arg: &str) -> CommandOutcome {
    FtpReply::multiline(
        ReplyCode::SystemStatus,
        "Extensions supported:",
        FEATURES.iter().map(|f| f.to_string()).collect(),
    )
    .into()
}
