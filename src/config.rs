//! Shared configuration values and defaults.

use std::time::Duration;

/// Time-to-live of a DNS record in seconds
pub type TTL = u32;

/// TTL applied to every challenge record created by this crate
pub const DEFAULT_TTL: TTL = 60;

/// How long a host should wait after creating a record before asking the CA to validate it
pub const DEFAULT_PROPAGATION_SECONDS: u64 = 60;

/// Base URL of the Hetzner DNS API
pub const HETZNER_API_ENDPOINT: &str = "https://dns.hetzner.com/api/v1";

/// How an authenticator locates the record it created once the challenge is cleaned up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CleanupStrategy {
    /// Look the record up by its name again. Works even if perform and cleanup run in different processes.
    #[default]
    ByName,
    /// Delete by the id returned from record creation, falling back to a lookup by name
    /// if no id was retained for the challenge.
    RetainedId,
}

/// Configuration object for a [`crate::authenticator::HetznerAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthenticatorConfig<'a> {
    /// The Hetzner DNS API token to authenticate with
    pub api_token: &'a str,
    /// TTL for created challenge records
    pub ttl: TTL,
    pub cleanup_strategy: CleanupStrategy,
    /// Override the API base URL. Uses [`HETZNER_API_ENDPOINT`] if unset
    pub base_url: Option<&'a str>,
    /// Timeout applied to every HTTP request. The HTTP client default is used if unset
    pub timeout: Option<Duration>,
}

impl<'a> AuthenticatorConfig<'a> {
    /// Create a config with default settings for the given token
    pub fn new(api_token: &'a str) -> Self {
        AuthenticatorConfig {
            api_token,
            ttl: DEFAULT_TTL,
            cleanup_strategy: CleanupStrategy::default(),
            base_url: None,
            timeout: None,
        }
    }
}
