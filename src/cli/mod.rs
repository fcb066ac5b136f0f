//! CLI interface using clap.
//!
//! Provides the command-line arguments for the tool.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{AppConfig, LoadMode, StrategyKind};

/// Export SMS from an iPhone backup.
///
/// Locates the SMS database in the backup directory (recursively) and writes
/// its messages to stdout or a file.
#[derive(Parser, Debug)]
#[command(name = "export-iphone-sms")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  export-iphone-sms txt
  export-iphone-sms -E latin1 txt > sms.txt
  export-iphone-sms -b /path/to/backup/copy csv > sms.csv
  export-iphone-sms -a '^\\+41' -o swiss.html html")]
pub struct Cli {
    /// Output format: txt, csv, xml, json or html.
    pub format: String,

    /// Output encoding (default utf-8).
    #[arg(short = 'E', long)]
    pub encoding: Option<String>,

    /// Backup directory to search (default: the MobileSync directory).
    #[arg(short, long)]
    pub backup_dir: Option<PathBuf>,

    /// Output file path (stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode: no progress output, fail instead of prompting.
    #[arg(short, long)]
    pub quiet: bool,

    /// Only export messages whose address starts with this regex.
    #[arg(short, long, value_name = "REGEX")]
    pub address: Option<String>,

    /// How to recognise the database: file-name or content-signature.
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Export while reading instead of preloading all messages.
    #[arg(long)]
    pub stream: bool,

    /// Configuration file (default: ~/.export-iphone-sms/config.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Overrides configuration values with the flags given on the command line.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(ref encoding) = self.encoding {
            config.export.encoding.clone_from(encoding);
        }
        if let Some(ref dir) = self.backup_dir {
            config.discovery.backup_dir = Some(dir.clone());
        }
        if let Some(strategy) = self.strategy {
            config.discovery.strategy = strategy;
        }
        if self.quiet {
            config.export.quiet = true;
        }
        if self.stream {
            config.export.mode = LoadMode::Stream;
        }
    }
}
