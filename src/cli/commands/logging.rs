//! `-v` / `AUTHPORTAL_LOG_LEVEL`: how much the client logs to stderr.

use clap::{Arg, ArgAction, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names by verbosity; 0 keeps only errors.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Tracing level for a verbosity, `None` for the default (errors only).
#[must_use]
pub const fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

fn parse_level(raw: &str) -> Result<u8, String> {
    let raw = raw.trim().to_lowercase();
    let name = if raw == "warning" { "warn" } else { raw.as_str() };
    if let Ok(verbosity) = name.parse::<u8>()
        && usize::from(verbosity) < LEVEL_NAMES.len()
    {
        return Ok(verbosity);
    }
    LEVEL_NAMES
        .iter()
        .position(|level| *level == name)
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| format!("unknown log level '{raw}', expected one of {}", LEVEL_NAMES.join(", ")))
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more to stderr: -v warn, -vv info, -vvv debug, -vvvv trace (env takes a level name or 0-4)")
            .env("AUTHPORTAL_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
