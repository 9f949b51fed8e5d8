//! CLI argument definitions using clap derive macros.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use sdtp_core::DEFAULT_CONCURRENCY;
use sdtp_core::constants::{DEFAULT_API_URL, DEFAULT_CERT_WARNING_DAYS, REQUEST_TIMEOUT_SECS};

/// Atmosphere SIPS SDTP client.
///
/// Lists, downloads and acknowledges files from an SDTP server using a client
/// certificate.
#[derive(Parser, Debug)]
#[command(name = "sdtp")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SDTP API base url
    #[arg(short = 'u', long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Path to client certificate (PEM)
    #[arg(short = 'c', long)]
    pub cert: PathBuf,

    /// Path to client private key (PEM)
    #[arg(short = 'k', long)]
    pub key: PathBuf,

    /// Set to false to skip checking certificate expiration
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub check_cert_expr: bool,

    /// Number of days before certificate expiration to issue a warning
    #[arg(long, default_value_t = DEFAULT_CERT_WARNING_DAYS)]
    pub check_cert_days: u32,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check the client certificate and its access to the server
    Check,

    /// List available files as JSON lines on stdout
    List(ListArgs),

    /// Download, verify and acknowledge available files
    Ingest(IngestArgs),

    /// Register the client certificate with the server
    Register,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: TagArgs,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Local directory to ingest data to (created if missing)
    #[arg(short = 'd', long)]
    pub dest_dir: PathBuf,

    #[command(flatten)]
    pub filter: TagArgs,

    /// Do not acknowledge files after a successful download
    #[arg(long)]
    pub no_ack: bool,

    /// Number of concurrent download workers (1-100)
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,
}

/// Tag filters selecting which files to list or ingest.
#[derive(Args, Debug, Clone, Default)]
pub struct TagArgs {
    /// <key>=<value> tag to filter by; repeatable or comma separated
    #[arg(short = 't', long = "tag", value_delimiter = ',', value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,

    /// SDTP 'stream' tag
    #[arg(long)]
    pub stream: Option<String>,

    /// SDTP 'mission' tag
    #[arg(long)]
    pub mission: Option<String>,

    /// SDTP 'ShortName' tag
    #[arg(long)]
    pub short_name: Option<String>,
}

impl TagArgs {
    /// Merges `--tag` pairs with the named tag flags; named flags win.
    pub fn to_tags(&self) -> HashMap<String, String> {
        let mut tags: HashMap<String, String> = self.tags.iter().cloned().collect();
        let named = [
            ("stream", &self.stream),
            ("mission", &self.mission),
            ("ShortName", &self.short_name),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                tags.insert(key.to_string(), value.clone());
            }
        }
        tags
    }
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid tag {raw:?}: expected <key>=<value>")),
    }
}
