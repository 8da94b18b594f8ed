use crate::upstream::{StatusOrder, DEFAULT_USERS_URL};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_API_BASE: &str = "api-base";
pub const ARG_API_USERNAME: &str = "api-username";
pub const ARG_API_PASSWORD: &str = "api-password";
pub const ARG_USERS_URL: &str = "users-url";
pub const ARG_STATUS_ORDER: &str = "status-order";

#[derive(Debug, Clone)]
pub struct Options {
    pub api_base: Url,
    pub api_username: String,
    pub api_password: SecretString,
    pub users_url: Url,
    pub status_order: StatusOrder,
}

impl Options {
    /// Parse upstream arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or a URL is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read_required = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        let api_base = read_required(ARG_API_BASE)?;
        let api_base =
            Url::parse(&api_base).with_context(|| format!("invalid --{ARG_API_BASE}: {api_base}"))?;

        let users_url = matches
            .get_one::<String>(ARG_USERS_URL)
            .map_or(DEFAULT_USERS_URL, String::as_str);
        let users_url = Url::parse(users_url)
            .with_context(|| format!("invalid --{ARG_USERS_URL}: {users_url}"))?;

        Ok(Self {
            api_base,
            api_username: read_required(ARG_API_USERNAME)?,
            api_password: SecretString::from(read_required(ARG_API_PASSWORD)?),
            users_url,
            status_order: matches
                .get_one::<StatusOrder>(ARG_STATUS_ORDER)
                .copied()
                .unwrap_or_default(),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE)
                .long(ARG_API_BASE)
                .help("Base URL of the basic-auth backend, example: https://api.tld/v1")
                .env("PORTAL_API_BASE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_USERNAME)
                .long(ARG_API_USERNAME)
                .help("Basic auth username for the backend")
                .env("PORTAL_API_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_PASSWORD)
                .long(ARG_API_PASSWORD)
                .help("Basic auth password for the backend")
                .env("PORTAL_API_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_USERS_URL)
                .long(ARG_USERS_URL)
                .help("User list endpoint")
                .env("PORTAL_USERS_URL")
                .default_value(DEFAULT_USERS_URL),
        )
        .arg(
            Arg::new(ARG_STATUS_ORDER)
                .long(ARG_STATUS_ORDER)
                .help("When to check the upstream status: after-body (parse JSON first) or before-body")
                .env("PORTAL_STATUS_ORDER")
                .default_value("after-body")
                .value_parser(|s: &str| s.parse::<StatusOrder>()),
        )
}
