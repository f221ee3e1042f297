use clap::{Args, Parser, Subcommand};
use hetzner_dns_authenticator::config::{
    self, DEFAULT_PROPAGATION_SECONDS, DEFAULT_TTL, HETZNER_API_ENDPOINT, TTL,
};

macro_rules! env_prefix {
    () => {
        "HETZNER_DNS_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hetzner DNS API token to authenticate with
    #[arg(
        long,
        value_name = "API_TOKEN",
        hide_env_values = true,
        env = concat!(env_prefix!(), "API_TOKEN")
    )]
    pub api_token: String,

    /// Set the loglevel of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    /// TTL of the created TXT records
    #[arg(
        long,
        value_name = "TTL",
        default_value_t = DEFAULT_TTL,
        env = concat!(env_prefix!(), "TTL")
    )]
    pub ttl: TTL,

    /// Seconds to wait after creating a record before the CA is asked to validate it
    #[arg(
        short = 'w',
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_PROPAGATION_SECONDS,
        env = concat!(env_prefix!(), "PROPAGATION_SECONDS")
    )]
    pub propagation_seconds: u64,

    /// How to find the record to delete during cleanup
    #[arg(
        value_enum,
        long,
        default_value_t = CleanupStrategy::ByName,
        env = concat!(env_prefix!(), "CLEANUP_STRATEGY")
    )]
    pub cleanup_strategy: CleanupStrategy,

    /// Base URL of the Hetzner DNS API
    #[arg(
        long,
        value_name = "URL",
        default_value = HETZNER_API_ENDPOINT,
        env = concat!(env_prefix!(), "BASE_URL")
    )]
    pub base_url: String,

    /// Timeout for each API request in seconds. Uses the HTTP client default if unset
    #[arg(
        long,
        value_name = "SECONDS",
        env = concat!(env_prefix!(), "TIMEOUT")
    )]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Subcommand)]
pub enum Command {
    /// Create the challenge record, then wait for it to propagate
    Perform(ChallengeArgs),
    /// Delete the challenge record
    Cleanup(ChallengeArgs),
    /// Create the record, wait, then delete it again. Useful to check credentials and zone setup
    Run(ChallengeArgs),
}

/// Identifies a single challenge. Falls back to the variables certbot passes to manual hooks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Args)]
pub struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    pub domain: String,

    /// Name of the TXT record. Defaults to `_acme-challenge.<domain>`
    #[arg(long, value_name = "NAME")]
    pub validation_name: Option<String>,

    /// Validation value to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    pub validation: String,
}

impl ChallengeArgs {
    pub fn validation_name(&self) -> String {
        match &self.validation_name {
            Some(n) => n.to_owned(),
            None => format!("_acme-challenge.{}", self.domain),
        }
    }
}

use clap::ValueEnum;
use log::LevelFilter;

/// Used to set the applications loglevel
// This is essentially a re-creation of log:Level. However, that enum doesn't derive ValueEnum, so we have to do it manually here
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}

/// How the record is located on cleanup
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum CleanupStrategy {
    ByName,
    RetainedId,
}
impl From<CleanupStrategy> for config::CleanupStrategy {
    fn from(value: CleanupStrategy) -> Self {
        match value {
            CleanupStrategy::ByName => config::CleanupStrategy::ByName,
            CleanupStrategy::RetainedId => config::CleanupStrategy::RetainedId,
        }
    }
}
