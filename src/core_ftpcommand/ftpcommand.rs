#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PORT,
    PASV,
    EPSV,
    TYPE,
    MODE,
    CWD,
    CDUP,
    PWD,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    LIST,
    NLST,
    MLSD,
    MLST,
    RETR,
    STOR,
    SIZE,
    MDTM,
    FEAT,
    OPTS,
    AUTH,
    PROT,
    PBSZ,
    SYST,
    NOOP,
    CLNT,
    SITE,
}

impl FtpCommand {
    /// Looks a verb up exactly as sent; `user` is not `USER`.
    pub fn from_verb(cmd: &str) -> Option<FtpCommand> {
        match cmd {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "TYPE" => Some(FtpCommand::TYPE),
            "MODE" => Some(FtpCommand::MODE),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "PWD" => Some(FtpCommand::PWD),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "MLSD" => Some(FtpCommand::MLSD),
            "MLST" => Some(FtpCommand::MLST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "FEAT" => Some(FtpCommand::FEAT),
            "OPTS" => Some(FtpCommand::OPTS),
            "AUTH" => Some(FtpCommand::AUTH),
            "PROT" => Some(FtpCommand::PROT),
            "PBSZ" => Some(FtpCommand::PBSZ),
            "SYST" => Some(FtpCommand::SYST),
            "NOOP" => Some(FtpCommand::NOOP),
            "CLNT" => Some(FtpCommand::CLNT),
            "SITE" => Some(FtpCommand::SITE),
            _ => None,
        }
    }

    /// Commands a client may send before logging in.
    pub fn allowed_before_login(self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::AUTH
                | FtpCommand::PBSZ
                | FtpCommand::PROT
                | FtpCommand::FEAT
                | FtpCommand::SYST
                | FtpCommand::NOOP
                | FtpCommand::OPTS
                | FtpCommand::CLNT
                | FtpCommand::TYPE
                | FtpCommand::MODE
        )
    }

    /// Commands whose parameter is mandatory.
    pub fn requires_argument(self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::PORT
                | FtpCommand::TYPE
                | FtpCommand::MODE
                | FtpCommand::CWD
                | FtpCommand::MKD
                | FtpCommand::RMD
                | FtpCommand::DELE
                | FtpCommand::RNFR
                | FtpCommand::RNTO
                | FtpCommand::RETR
                | FtpCommand::STOR
                | FtpCommand::SIZE
                | FtpCommand::MDTM
                | FtpCommand::OPTS
                | FtpCommand::AUTH
                | FtpCommand::PROT
                | FtpCommand::PBSZ
                | FtpCommand::CLNT
                | FtpCommand::SITE
        )
    }
}

/// Splits a command line at the first space. The parameter is the raw
/// remainder of the line and is not split any further.
pub fn split_command_line(line: &str) -> (&str, &str) {
    match line.find(' ') {
        Some(index) => (&line[..index], &line[index + 1..]),
        None => (line, ""),
    }
}
