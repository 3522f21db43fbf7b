//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::session;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        session_secret: session_opts.secret,
        production: session_opts.production,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn blank_secret_is_rejected() {
        temp_env::with_vars(
            [("HABILITA_ENV", None::<&str>), ("HABILITA_LOG_LEVEL", None)],
            || {
                let matches = crate::cli::commands::new()
                    .try_get_matches_from(vec![
                        "habilita",
                        "--dsn",
                        "postgres://localhost/habilita",
                        "--session-secret",
                        "   ",
                    ])
                    .unwrap();
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err
                        .to_string()
                        .contains("missing required argument: --session-secret"));
                }
            },
        );
    }

    #[test]
    fn server_action_carries_session_options() {
        temp_env::with_vars(
            [("HABILITA_ENV", None::<&str>), ("HABILITA_LOG_LEVEL", None)],
            || {
                let matches = crate::cli::commands::new()
                    .try_get_matches_from(vec![
                        "habilita",
                        "--dsn",
                        "postgres://localhost/habilita",
                        "--session-secret",
                        "clave",
                        "--environment",
                        "production",
                        "--port",
                        "9000",
                    ])
                    .unwrap();
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("expected a server action");
                };
                assert_eq!(args.port, 9000);
                assert!(args.production);
                assert_eq!(args.session_secret.expose_secret(), "clave");
            },
        );
    }

    #[test]
    fn invalid_environment_from_env_is_a_parse_error() {
        temp_env::with_vars(
            [("HABILITA_ENV", Some("staging")), ("HABILITA_LOG_LEVEL", None)],
            || {
                let result = crate::cli::commands::new().try_get_matches_from(vec![
                    "habilita",
                    "--dsn",
                    "postgres://localhost/habilita",
                    "--session-secret",
                    "clave",
                ]);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
                }
            },
        );
    }
}
