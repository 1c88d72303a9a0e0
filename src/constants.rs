// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9]{1,32}$";
pub const ANONYMOUS_USER: &str = "anonymous";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cloudftpd.toml";

/// Separator used for every path the client sees.
pub const FTP_SEPARATOR: char = '/';
/// Separator of the "other" convention, refused in client paths.
pub const FOREIGN_SEPARATOR: char = '\\';

pub fn is_anonymous(username: &str) -> bool {
    username.eq_ignore_ascii_case(ANONYMOUS_USER)
}

/// Longest command line accepted, CRLF included.
pub const MAX_COMMAND_LINE: usize = 4096;
