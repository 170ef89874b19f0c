use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use crate::brute::{CredentialSource, EngineConfig};
use crate::error::{Error, Result};
use crate::scanner::{ScanOptions, ScanProfile};

const SOURCE_USAGE: &str = "use exactly one of: \
    --username with --password-list, \
    --credentials-list, \
    --usernames-list with --password-list";

#[derive(Parser, Debug)]
#[clap(
    name = "pentest-rs",
    version,
    about = "Penetration testing toolkit - network scanning and SSH brute force"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    /// Directory for result artifacts
    #[clap(long, global = true, default_value = "results")]
    pub results_dir: PathBuf,

    /// Log file
    #[clap(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Silent mode (errors only)
    #[clap(short, long, global = true)]
    pub silent: bool,

    /// Do not print the banner
    #[clap(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Brute force a login service
    Brute(BruteArgs),
    /// Scan TCP ports on a target
    Scan(ScanArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Service {
    Ssh,
}

#[derive(Args, Debug)]
pub struct BruteArgs {
    /// Target IP address or hostname
    pub target: String,

    /// Service to brute force
    #[clap(short = 'S', long, value_enum, default_value = "ssh")]
    pub service: Service,

    /// Service port
    #[clap(short, long, default_value = "22")]
    pub port: u16,

    /// Username for single user brute force
    #[clap(short, long)]
    pub username: Option<String>,

    /// Path to password list file
    #[clap(short = 'P', long)]
    pub password_list: Option<PathBuf>,

    /// Path to usernames list file
    #[clap(short = 'U', long)]
    pub usernames_list: Option<PathBuf>,

    /// Path to credentials list file (username:password per line)
    #[clap(short = 'C', long)]
    pub credentials_list: Option<PathBuf>,

    /// Per-attempt timeout in seconds
    #[clap(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Pause between attempts in milliseconds
    #[clap(long, default_value = "100")]
    pub delay_ms: u64,

    /// Do not write a result file on success
    #[clap(long)]
    pub no_save: bool,
}

/// 三种字典配置之一
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    SingleUser { username: String, password_list: PathBuf },
    PairedList { credentials_list: PathBuf },
    Dictionary { usernames_list: PathBuf, password_list: PathBuf },
}

impl BruteArgs {
    pub fn selection(&self) -> Result<SourceSelection> {
        let selection = match (
            &self.username,
            &self.usernames_list,
            &self.password_list,
            &self.credentials_list,
        ) {
            (Some(username), None, Some(password_list), None) => SourceSelection::SingleUser {
                username: username.clone(),
                password_list: password_list.clone(),
            },
            (None, None, None, Some(credentials_list)) => SourceSelection::PairedList {
                credentials_list: credentials_list.clone(),
            },
            (None, Some(usernames_list), Some(password_list), None) => SourceSelection::Dictionary {
                usernames_list: usernames_list.clone(),
                password_list: password_list.clone(),
            },
            _ => return Err(Error::Config(format!("invalid combination of options; {}", SOURCE_USAGE))),
        };

        Ok(selection)
    }

    /// 读取字典，失败时会话不会开始
    pub fn credential_source(&self) -> Result<CredentialSource> {
        match self.selection()? {
            SourceSelection::SingleUser { username, password_list } => {
                CredentialSource::single_user(username, password_list)
            }
            SourceSelection::PairedList { credentials_list } => {
                CredentialSource::paired_list(credentials_list)
            }
            SourceSelection::Dictionary { usernames_list, password_list } => {
                CredentialSource::dictionary(usernames_list, password_list)
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            timeout: Duration::from_secs(self.timeout),
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Target IP address or hostname
    pub target: String,

    /// Ports to scan (default depends on scan type)
    #[clap(short, long)]
    pub ports: Option<String>,

    /// Type of scan to perform
    #[clap(short = 't', long = "type", value_enum, default_value = "basic")]
    pub scan_type: ScanProfile,

    /// Connection timeout in milliseconds
    #[clap(long, default_value = "1000")]
    pub timeout_ms: u64,

    /// Number of concurrent workers
    #[clap(short = 'T', long, default_value = "400")]
    pub threads: usize,
}

impl ScanArgs {
    pub fn ports_spec(&self) -> &str {
        self.ports
            .as_deref()
            .unwrap_or_else(|| self.scan_type.default_ports())
    }

    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            profile: self.scan_type,
            timeout: Duration::from_millis(self.timeout_ms),
            threads: self.threads,
        }
    }
}
