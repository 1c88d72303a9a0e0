use std::fmt;

/// Reply codes used by the server (RFC 959, RFC 2228, RFC 2428, RFC 4217).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ReplyCode {
    TransferStarting = 125,
    AboutToOpenDataConnection = 150,
    Okay = 200,
    SystemStatus = 211,
    FileStatus = 213,
    NameSystemType = 215,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    SuccessClosingDataConnection = 226,
    EnteringPassiveMode = 227,
    EnteringExtendedPassiveMode = 229,
    LoggedIn = 230,
    SecurityExchangeDone = 234,
    FileActionOk = 250,
    PathCreated = 257,
    NeedPassword = 331,
    FileActionPendingInfo = 350,
    ServiceNotAvailable = 421,
    CantOpenDataConnection = 425,
    TransferAborted = 426,
    FileBusy = 450,
    LocalError = 451,
    CommandUnrecognized = 500,
    SyntaxError = 501,
    CommandNotImplemented = 502,
    BadSequence = 503,
    ParameterNotImplemented = 504,
    NotLoggedIn = 530,
    SecurityUnavailable = 534,
    FileNoAccess = 550,
    InsufficientStorage = 552,
}

impl ReplyCode {
    pub fn code(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    pub code: ReplyCode,
    pub message: String,
    /// Body lines of a multi-line reply; empty for ordinary replies.
    pub details: Vec<String>,
}

impl FtpReply {
    pub fn new(code: ReplyCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Builds a `<code>-header` / ` line` / `<code> End` reply.
    pub fn multiline(code: ReplyCode, header: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            code,
            message: header.into(),
            details,
        }
    }

    /// Wire form of the reply, CRLF terminated.
    pub fn to_line(&self) -> String {
        let code = self.code.code();
        if self.details.is_empty() {
            return format!("{} {}\r\n", code, self.message);
        }

        let mut out = format!("{}-{}\r\n", code, self.message);
        for line in &self.details {
            out.push(' ');
            out.push_str(line);
            out.push_str("\r\n");
        }
        out.push_str(&format!("{} End\r\n", code));
        out
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code.code(), self.message)
    }
}
