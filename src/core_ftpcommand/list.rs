use crate::core_ftpcommand::outcome::CommandOutcome;
use crate::core_ftpcommand::utils::{send_over_data_channel, vfs_failure};
use crate::core_network::ControlConnection;
use crate::core_vfs::FileSystemEntry;
use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// `LIST`: Unix long format.
    Long,
    /// `NLST`: names only.
    Names,
    /// `MLSD`: machine-readable facts.
    Facts,
}

pub async fn handle_list_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    send_listing(conn, arg, ListingFormat::Long).await
}

pub async fn handle_nlst_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    send_listing(conn, arg, ListingFormat::Names).await
}

pub async fn handle_mlsd_command(conn: &mut ControlConnection, arg: &str) -> CommandOutcome {
    send_listing(conn, arg, ListingFormat::Facts).await
}

async fn send_listing(
    conn: &mut ControlConnection,
    arg: &str,
    format: ListingFormat,
) -> CommandOutcome {
    let entries = match conn.vfs.enumerate_directory(listing_target(arg)).await {
        Ok(entries) => entries,
        Err(e) => return vfs_failure(e),
    };

    let body = render_listing(&entries, format);
    let bytes = conn.session.encoding.encode(&body);
    send_over_data_channel(conn, &bytes[..], "Successfully sent file system listing.").await
}

pub fn render_listing(entries: &[FileSystemEntry], format: ListingFormat) -> String {
    let now = Local::now();
    entries
        .iter()
        .map(|entry| {
            let line = match format {
                ListingFormat::Long => entry.to_list_line(now),
                ListingFormat::Names => entry.name.clone(),
                ListingFormat::Facts => entry.to_mlsd_line(),
            };
            format!("{}\r\n", line)
        })
        .collect()
}

/// Drops `ls`-style flags (`-la`) some clients put in front of the path.
pub fn listing_target(arg: &str) -> Option<&str> {
    let arg = arg.trim();
    let path = if arg.starts_with('-') {
        arg.split_once(' ').map(|(_, rest)| rest.trim()).unwrap_or("")
    } else {
        arg
    };
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}
