pub mod account;
pub mod api;
pub mod logging;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("authportal")
        .about("Account registration, login and profile client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles);

    let command = api::with_args(command);
    let command = logging::with_args(command);
    account::with_subcommands(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "authportal");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Account registration, login and profile client"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
        assert!(
            command
                .get_long_version()
                .unwrap()
                .to_string()
                .contains(crate::GIT_COMMIT_HASH)
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let unset = [
            ("AUTHPORTAL_API_BASE_URL", None::<&str>),
            ("AUTHPORTAL_LOG_LEVEL", None),
        ];
        temp_env::with_vars(unset, || {
            let matches = new().get_matches_from(vec![
                "authportal",
                "profile",
                "--api-base-url",
                "http://127.0.0.1:9000/api/v2",
                "-vv",
            ]);
            assert_eq!(
                matches
                    .get_one::<String>(api::ARG_API_BASE_URL)
                    .map(String::as_str),
                Some("http://127.0.0.1:9000/api/v2")
            );
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(2)
            );
        });
    }

    #[test]
    fn test_debug_assert() {
        new().debug_assert();
    }
}
