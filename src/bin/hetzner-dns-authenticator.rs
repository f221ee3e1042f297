mod cli;
mod executor;

use std::{process::ExitCode, time::Duration};

use clap::Parser;
use env_logger::Builder;
use log::{error, info};

use hetzner_dns_authenticator::{authenticator::HetznerAuthenticator, config::AuthenticatorConfig};

use cli::{Cli, Command};
use executor::{Action, Challenge, Executor};

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new().filter_level(cli.loglevel.into()).init();

    let config = AuthenticatorConfig {
        api_token: cli.api_token.as_str(),
        ttl: cli.ttl,
        cleanup_strategy: cli.cleanup_strategy.into(),
        base_url: Some(cli.base_url.as_str()),
        timeout: cli.timeout.map(Duration::from_secs),
    };
    let mut authenticator = match HetznerAuthenticator::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            error!("Unable to create authenticator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (action, args) = match &cli.command {
        Command::Perform(args) => (Action::Perform, args),
        Command::Cleanup(args) => (Action::Cleanup, args),
        Command::Run(args) => (Action::Run, args),
    };
    let challenge = Challenge {
        domain: args.domain.to_owned(),
        validation_name: args.validation_name(),
        validation: args.validation.to_owned(),
    };

    let mut executor = Executor::new(
        authenticator.as_mut(),
        Duration::from_secs(cli.propagation_seconds),
    );
    match executor.run(action, &challenge) {
        Ok(_) => {
            info!("Completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
