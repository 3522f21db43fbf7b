use crate::{
    habilita::{self, AppContext},
    session::SessionCodec,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub session_secret: SecretString,
    pub production: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the session secret is unusable, the DSN is invalid, the
/// database is unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    // No token may ever be signed with a missing or default secret.
    let codec = SessionCodec::new(&args.session_secret, args.production)
        .context("Session secret is required")?;

    let dsn = Url::parse(&args.dsn).context("Invalid database connection string")?;
    debug!(
        "database host: {}",
        dsn.host_str().unwrap_or("<unix socket>")
    );

    info!(
        production = args.production,
        "starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let context = AppContext::connect(dsn.as_str(), codec).await?;

    habilita::new(args.port, context).await
}
