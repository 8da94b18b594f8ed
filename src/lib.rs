//! # Portal (sign-in and profile service)
//!
//! `portal` is the server side of a small web front end. It has two surfaces:
//!
//! - **Sign-in**: the `login` action stores the submitted email in the
//!   `sessionid` cookie, the `register` action redirects to `/`.
//! - **Profile**: reads the `sessionid` cookie, fetches the `Colegio` object
//!   collection from a basic-auth backend, fetches the user list from a public
//!   placeholder API and returns both payloads merged.
//!
//! ## Session model
//!
//! The cookie content is the identity. There is no password verification,
//! signing, expiry or server-side session store.

pub mod api;
pub mod cli;
pub mod upstream;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
