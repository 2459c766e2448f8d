//! Maps parsed arguments to the [`Action`] to run.

use crate::cli::{
    actions::{
        Action, login,
        profile::{self, ProfileCommand},
        register,
    },
    commands::{
        account::{
            ARG_FILE, ARG_FIRST_NAME, ARG_IDENTIFIER, ARG_LAST_NAME, ARG_MAIL, ARG_PASSWORD,
            ARG_PHONE, ARG_RESEND, ARG_USERNAME, CMD_DELETE_PICTURE, CMD_FORGOT_PASSWORD,
            CMD_LOGIN, CMD_LOGOUT, CMD_PROFILE, CMD_REGISTER, CMD_RESEND, CMD_RESET_PASSWORD,
            CMD_UPLOAD,
        },
        api::Options,
    },
    globals::GlobalArgs,
};
use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(Options::parse(matches)?);
    let (name, sub) = matches.subcommand().context("missing subcommand")?;

    let profile_action = |command| {
        Action::Profile(profile::Args {
            globals: globals.clone(),
            command,
        })
    };

    let action = match name {
        CMD_REGISTER => Action::Register(register::Args {
            first_name: required(sub, ARG_FIRST_NAME)?,
            last_name: required(sub, ARG_LAST_NAME)?,
            username: required(sub, ARG_USERNAME)?,
            phone: required(sub, ARG_PHONE)?,
            mail: required(sub, ARG_MAIL)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
            resend: sub.get_one::<u32>(ARG_RESEND).copied().unwrap_or(0),
            globals: globals.clone(),
        }),
        CMD_RESEND => Action::Resend(register::ResendArgs {
            mail: required(sub, ARG_MAIL)?,
            globals: globals.clone(),
        }),
        CMD_LOGIN => Action::Login(login::Args {
            identifier: required(sub, ARG_IDENTIFIER)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
            globals: globals.clone(),
        }),
        CMD_FORGOT_PASSWORD => Action::ForgotPassword(login::ForgotArgs {
            mail: sub.get_one::<String>(ARG_MAIL).cloned(),
            globals: globals.clone(),
        }),
        CMD_PROFILE => profile_action(ProfileCommand::Show),
        CMD_UPLOAD => profile_action(ProfileCommand::Upload(
            sub.get_one::<PathBuf>(ARG_FILE)
                .cloned()
                .context("missing required argument: <file>")?,
        )),
        CMD_DELETE_PICTURE => profile_action(ProfileCommand::DeletePicture),
        CMD_LOGOUT => profile_action(ProfileCommand::Logout),
        CMD_RESET_PASSWORD => profile_action(ProfileCommand::ResetPassword),
        other => bail!("unknown command: {other}"),
    };

    Ok(action)
}
