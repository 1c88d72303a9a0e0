/// One line of the passwd file: `username:bcrypt_hash:total_bytes[:disabled]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    username: String,
    hashed_password: String,
    total_bytes: u64,
    disabled: bool,
}

impl PasswdEntry {
    pub fn new(username: &str, hashed_password: &str, total_bytes: u64) -> Self {
        PasswdEntry {
            username: username.to_string(),
            hashed_password: hashed_password.to_string(),
            total_bytes,
            disabled: false,
        }
    }

    // bcrypt hashes never contain ':'
    pub fn from_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.trim_end().split(':').collect();
        let disabled = match parts.len() {
            3 => false,
            4 if parts[3] == "disabled" => true,
            _ => return None,
        };
        if parts[0].is_empty() || parts[1].is_empty() {
            return None;
        }
        let total_bytes = parts[2].parse::<u64>().ok()?;

        Some(PasswdEntry {
            username: parts[0].to_string(),
            hashed_password: parts[1].to_string(),
            total_bytes,
            disabled,
        })
    }

    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{}:{}:{}",
            self.username, self.hashed_password, self.total_bytes
        );
        if self.disabled {
            line.push_str(":disabled");
        }
        line
    }

    pub fn get_hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enabled_and_disabled_lines() {
        let entry = PasswdEntry::from_line("bob:$2b$04$abc:1048576").unwrap();
        assert_eq!(entry.get_username(), "bob");
        assert_eq!(entry.get_hashed_password(), "$2b$04$abc");
        assert_eq!(entry.get_total_bytes(), 1048576);
        assert!(!entry.is_disabled());

        let entry = PasswdEntry::from_line("eve:$2b$04$xyz:10:disabled\n").unwrap();
        assert!(entry.is_disabled());
        assert_eq!(entry.to_line(), "eve:$2b$04$xyz:10:disabled");
    }

    #[test]
    fn test_reject_malformed_lines() {
        assert!(PasswdEntry::from_line("bob:hash").is_none());
        assert!(PasswdEntry::from_line("bob:hash:lots").is_none());
        assert!(PasswdEntry::from_line("bob:hash:10:locked").is_none());
        assert!(PasswdEntry::from_line(":hash:10").is_none());
    }
}
