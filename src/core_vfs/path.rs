use crate::constants::{FOREIGN_SEPARATOR, FTP_SEPARATOR};
use crate::core_vfs::error::VfsError;
use std::path::{Path, PathBuf};

/// Resolves `ftp_path` against `working_dir` into a normalized absolute FTP
/// path. `.` segments are dropped and `..` walks up, never above `/`.
pub fn resolve_ftp_path(working_dir: &str, ftp_path: &str) -> Result<String, VfsError> {
    if ftp_path.contains(FOREIGN_SEPARATOR) {
        return Err(VfsError::ForeignSeparator);
    }

    let joined = if ftp_path.starts_with(FTP_SEPARATOR) {
        ftp_path.to_string()
    } else {
        format!("{}{}{}", working_dir, FTP_SEPARATOR, ftp_path)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split(FTP_SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    Ok(format!("{}{}", FTP_SEPARATOR, segments.join("/")))
}

/// Maps a normalized FTP path onto the user's base directory.
pub fn ftp_to_local(user_base: &Path, ftp_path: &str) -> Result<PathBuf, VfsError> {
    let mut local = user_base.to_path_buf();
    for segment in ftp_path.split(FTP_SEPARATOR).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(VfsError::OutsideRoot);
        }
        local.push(segment);
    }

    if !local.starts_with(user_base) {
        return Err(VfsError::OutsideRoot);
    }
    Ok(local)
}

/// Working directory one segment up; `/` stays `/`.
pub fn parent_ftp_path(path: &str) -> String {
    match path.trim_end_matches(FTP_SEPARATOR).rfind(FTP_SEPARATOR) {
        Some(0) | None => FTP_SEPARATOR.to_string(),
        Some(index) => path[..index].to_string(),
    }
}

pub fn is_root(ftp_path: &str) -> bool {
    ftp_path == "/"
}
