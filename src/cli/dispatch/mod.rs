//! Map validated CLI arguments to the action to run.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::upstream;
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let upstream_opts = upstream::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        api_base: upstream_opts.api_base,
        api_username: upstream_opts.api_username,
        api_password: upstream_opts.api_password,
        users_url: upstream_opts.users_url,
        status_order: upstream_opts.status_order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::StatusOrder;
    use secrecy::ExposeSecret;

    fn env() -> [(&'static str, Option<&'static str>); 6] {
        [
            ("PORTAL_API_BASE", Some("https://api.tld/v1")),
            ("PORTAL_API_USERNAME", Some("user")),
            ("PORTAL_API_PASSWORD", Some("pass")),
            ("PORTAL_USERS_URL", None),
            ("PORTAL_STATUS_ORDER", None),
            ("PORTAL_PORT", None),
        ]
    }

    #[test]
    fn server_action_from_env() {
        temp_env::with_vars(env(), || {
            let matches = crate::cli::commands::new().get_matches_from(vec!["portal"]);
            let result = handler(&matches);
            assert!(result.is_ok());
            if let Ok(Action::Server(args)) = result {
                assert_eq!(args.port, 8080);
                assert_eq!(args.api_base.as_str(), "https://api.tld/v1");
                assert_eq!(args.api_username, "user");
                assert_eq!(args.api_password.expose_secret(), "pass");
                assert_eq!(
                    args.users_url.as_str(),
                    "https://jsonplaceholder.typicode.com/users"
                );
                assert_eq!(args.status_order, StatusOrder::AfterBody);
            }
        });
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        temp_env::with_vars(env(), || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "portal",
                "--api-base",
                "not a url",
            ]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("invalid --api-base"));
            }
        });
    }

    #[test]
    fn blank_username_is_rejected() {
        temp_env::with_vars(env(), || {
            let matches = crate::cli::commands::new().get_matches_from(vec![
                "portal",
                "--api-username",
                "  ",
            ]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err
                    .to_string()
                    .contains("missing required argument: --api-username"));
            }
        });
    }
}
