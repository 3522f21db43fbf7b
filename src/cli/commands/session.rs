use anyhow::{anyhow, Result};
use clap::{builder::PossibleValuesParser, Arg, Command};
use secrecy::SecretString;

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_ENVIRONMENT: &str = "environment";

pub const ENV_PRODUCTION: &str = "production";
pub const ENV_DEVELOPMENT: &str = "development";

#[derive(Debug)]
pub struct Options {
    pub secret: SecretString,
    pub production: bool,
}

impl Options {
    /// Read session options from validated matches.
    ///
    /// # Errors
    /// Returns an error if the secret is missing or blank.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let secret = matches
            .get_one::<String>(ARG_SESSION_SECRET)
            .filter(|secret| !secret.trim().is_empty())
            .cloned()
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_SESSION_SECRET}"))?;

        let production = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .is_some_and(|env| env == ENV_PRODUCTION);

        Ok(Self {
            secret: SecretString::from(secret),
            production,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long("session-secret")
                .help("Secret used to sign session tokens (HS256)")
                .env("HABILITA_SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long("environment")
                .help("Runtime environment; session cookies are Secure in production")
                .env("HABILITA_ENV")
                .default_value(ENV_DEVELOPMENT)
                .value_parser(PossibleValuesParser::new([ENV_DEVELOPMENT, ENV_PRODUCTION])),
        )
}
