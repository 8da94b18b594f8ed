use crate::{
    api,
    cli::telemetry,
    upstream::{Credentials, StatusOrder, Upstream},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub api_base: Url,
    pub api_username: String,
    pub api_password: SecretString,
    pub users_url: Url,
    pub status_order: StatusOrder,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the upstream client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let credentials = Credentials::new(args.api_username, args.api_password);

    debug!(
        api_base = %args.api_base,
        api_username = credentials.username(),
        users_url = %args.users_url,
        status_order = ?args.status_order,
        "upstream configuration"
    );

    let upstream = Upstream::new(
        args.api_base,
        args.users_url,
        credentials,
        args.status_order,
    )
    .context("Failed to build upstream client")?;

    let result = api::new(args.port, Arc::new(upstream)).await;

    telemetry::shutdown_tracer();

    result
}
