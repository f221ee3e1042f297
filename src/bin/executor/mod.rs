use std::{thread::sleep, time::Duration};

use hetzner_dns_authenticator::authenticator::{Authenticator, PluginError};
use log::{info, warn};

/// What to do with a challenge
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Perform,
    Cleanup,
    /// Perform, then cleanup in the same process
    Run,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Challenge {
    pub domain: String,
    pub validation_name: String,
    pub validation: String,
}

/// An executor drives an authenticator the way an ACME client would: perform, wait for propagation, cleanup
pub struct Executor<'a> {
    authenticator: &'a mut dyn Authenticator,
    propagation: Duration,
}

impl<'a> Executor<'a> {
    pub fn new(authenticator: &'a mut dyn Authenticator, propagation: Duration) -> Executor<'a> {
        Self {
            authenticator,
            propagation,
        }
    }

    pub fn run(&mut self, action: Action, challenge: &Challenge) -> Result<(), PluginError> {
        match action {
            Action::Perform => self.perform(challenge),
            Action::Cleanup => self.cleanup(challenge),
            Action::Run => {
                self.perform(challenge)?;
                self.cleanup(challenge)
            }
        }
    }

    fn perform(&mut self, challenge: &Challenge) -> Result<(), PluginError> {
        info!(
            "Performing challenge for {} ({})",
            challenge.domain, challenge.validation_name
        );
        self.authenticator.perform(
            &challenge.domain,
            &challenge.validation_name,
            &challenge.validation,
        )?;

        if !self.propagation.is_zero() {
            info!(
                "Waiting {} seconds for DNS changes to propagate",
                self.propagation.as_secs()
            );
            sleep(self.propagation);
        }
        Ok(())
    }

    fn cleanup(&mut self, challenge: &Challenge) -> Result<(), PluginError> {
        info!(
            "Cleaning up challenge for {} ({})",
            challenge.domain, challenge.validation_name
        );
        self.authenticator
            .cleanup(
                &challenge.domain,
                &challenge.validation_name,
                &challenge.validation,
            )
            .map_err(|e| {
                warn!("Cleanup failed, the challenge record may have to be removed manually");
                e
            })
    }
}
