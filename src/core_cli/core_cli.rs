use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cloudftpd", about = "A multi-user FTP server with per-user storage quotas.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
