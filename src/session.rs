/// How the next data channel gets established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    Active,
    Passive,
    ExtendedPassive,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncryptionFlags {
    /// Set once the control channel handshake succeeded.
    pub control_tls: bool,
    /// Applies to the next data channel opened, not to an open one.
    pub data_tls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Ascii,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

/// Per-client protocol state. The working directory lives in the
/// session's `VirtualFileSystem`.
#[derive(Debug)]
pub struct ClientSession {
    pub authenticated: bool,
    pub username: Option<String>,
    pub connection_type: ConnectionType,
    pub encryption: EncryptionFlags,
    pub encoding: TextEncoding,
    pub client_name: Option<String>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            authenticated: false,
            username: None,
            connection_type: ConnectionType::None,
            encryption: EncryptionFlags::default(),
            encoding: TextEncoding::Utf8,
            client_name: None,
        }
    }

    pub fn log_in(&mut self, username: &str) {
        self.authenticated = true;
        self.username = Some(username.to_string());
    }

    pub fn log_out(&mut self) {
        self.authenticated = false;
        self.username = None;
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
