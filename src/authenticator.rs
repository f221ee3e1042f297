//! The challenge-facing side of this crate.
//!
//! An ACME client hands each DNS-01 challenge to an [`Authenticator`]: first [`Authenticator::perform()`]
//! to publish the validation value, and once the CA has checked it, [`Authenticator::cleanup()`] to remove it again.
//!
//! The following authenticators are currently available:
//! - [`HetznerAuthenticator`]: Manages challenge records through the Hetzner DNS API

mod hetzner;

pub use hetzner::HetznerAuthenticator;

use std::fmt::Display;

use crate::hetzner::HetznerError;

/// An authenticator publishes and removes the TXT record for a single DNS-01 challenge.
///
/// `perform` is called once per challenge. `cleanup` is only called for challenges whose `perform` succeeded.
pub trait Authenticator {
    /// Publish `validation` as a TXT record called `validation_name` for `domain`
    fn perform(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), PluginError>;
    /// Remove the record published by [`Authenticator::perform()`]
    fn cleanup(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), PluginError>;
}

// Generic error returned by an authenticator. Carries the message of the underlying failure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginError {
    msg: String,
}
impl Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg.as_str())
    }
}
impl std::error::Error for PluginError {}

impl From<String> for PluginError {
    fn from(s: String) -> Self {
        PluginError { msg: s }
    }
}

impl From<HetznerError> for PluginError {
    fn from(e: HetznerError) -> Self {
        PluginError { msg: e.to_string() }
    }
}
