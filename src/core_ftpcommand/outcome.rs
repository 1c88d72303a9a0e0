use crate::core_ftpcommand::reply::FtpReply;

/// Result of running one command handler.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Send the reply and read the next command.
    Reply(FtpReply),
    /// The handler already wrote everything it had to say.
    Silent,
    /// Send the reply, then the very next line must continue the dialog.
    NeedsFollowup(FtpReply, Followup),
    /// Send the reply and end the session because of an error.
    Fatal(FtpReply),
    /// Send the reply and end the session normally (QUIT).
    Close(FtpReply),
    /// The transport is gone; end the session without replying.
    Disconnect,
}

/// Second half of a two-step dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    /// `USER` was accepted; only `PASS` may come next.
    Password { username: String },
    /// `RNFR` was accepted; only `RNTO` may come next.
    RenameTo { from: String },
}

impl From<FtpReply> for CommandOutcome {
    fn from(reply: FtpReply) -> Self {
        CommandOutcome::Reply(reply)
    }
}
