//! # Authportal (account client)
//!
//! `authportal` drives the account pages of a remote authentication API:
//! registration with email verification, login, profile management and
//! password-reset requests.
//!
//! ## Layers
//!
//! - **Validation:** pure field checks that run before any request is built.
//!   Error maps only contain the fields that failed.
//! - **API client:** one call per backend endpoint. Every response body shaped
//!   `{success, message, ...}` becomes a [`api::Reply`]; only missing or
//!   unstructured responses surface as [`api::ApiError`].
//! - **Session:** the cached user record and the backend session cookie live
//!   behind a single [`session::SessionContext`]. The cache is for display only;
//!   the backend cookie is the real credential.
//! - **Account flows:** the register, login and profile pages without a UI.
//!   They return notices and redirects as data.
//!
//! Passwords are sent to the backend as entered and never stored locally.

pub mod account;
pub mod api;
pub mod cli;
pub mod session;
pub mod validation;

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
