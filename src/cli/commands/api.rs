//! Backend and local state options shared by every subcommand.

use crate::api::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_TIMEOUT: &str = "timeout";

/// Directory under `$HOME` used when `--state-dir` is not set.
const STATE_DIR_NAME: &str = ".authportal";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let default_timeout: &'static str =
        Box::leak(DEFAULT_TIMEOUT.as_secs().to_string().into_boxed_str());

    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Base URL of the account API")
                .env("AUTHPORTAL_API_BASE_URL")
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long(ARG_STATE_DIR)
                .help("Directory holding the cached user and session cookie (default: $HOME/.authportal)")
                .env("AUTHPORTAL_STATE_DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("AUTHPORTAL_TIMEOUT")
                .default_value(default_timeout)
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub base_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl Options {
    /// # Errors
    /// Returns an error if no state directory is given and `$HOME` is unset.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let base_url = matches
            .get_one::<String>(ARG_API_BASE_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let state_dir = match matches.get_one::<PathBuf>(ARG_STATE_DIR) {
            Some(dir) => dir.clone(),
            None => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(STATE_DIR_NAME))
                .context("missing required argument: --state-dir ($HOME is not set)")?,
        };

        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            base_url,
            state_dir,
            timeout,
        })
    }
}
