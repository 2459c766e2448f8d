//! Account subcommands.

use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

pub const CMD_REGISTER: &str = "register";
pub const CMD_RESEND: &str = "resend";
pub const CMD_LOGIN: &str = "login";
pub const CMD_PROFILE: &str = "profile";
pub const CMD_UPLOAD: &str = "upload";
pub const CMD_DELETE_PICTURE: &str = "delete-picture";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";

pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PHONE: &str = "phone";
pub const ARG_MAIL: &str = "mail";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_IDENTIFIER: &str = "identifier";
pub const ARG_RESEND: &str = "resend";
pub const ARG_FILE: &str = "file";

const ENV_PASSWORD: &str = "AUTHPORTAL_PASSWORD";

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help("Account password")
        .env(ENV_PASSWORD)
        .hide_env_values(true)
        .required(true)
}

fn mail_arg() -> Arg {
    Arg::new(ARG_MAIL)
        .long(ARG_MAIL)
        .help("Email address")
}

fn register() -> Command {
    Command::new(CMD_REGISTER)
        .about("Create an account and send the verification email")
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long(ARG_FIRST_NAME)
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long(ARG_LAST_NAME)
                .help("Last name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_USERNAME)
                .long(ARG_USERNAME)
                .help("Username, 3 to 20 letters, digits or underscores")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PHONE)
                .long(ARG_PHONE)
                .help("Phone number")
                .required(true),
        )
        .arg(mail_arg().required(true))
        .arg(password_arg())
        .arg(
            Arg::new(ARG_RESEND)
                .long(ARG_RESEND)
                .help("Resend the verification email this many times, waiting out the cooldown before each")
                .default_value("0")
                .value_parser(clap::value_parser!(u32)),
        )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(register())
        .subcommand(
            Command::new(CMD_RESEND)
                .about("Send the verification email again")
                .arg(mail_arg().required(true)),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and cache the user locally")
                .arg(
                    Arg::new(ARG_IDENTIFIER)
                        .long(ARG_IDENTIFIER)
                        .help("Email or username")
                        .required(true),
                )
                .arg(password_arg()),
        )
        .subcommand(Command::new(CMD_PROFILE).about("Show the signed-in user"))
        .subcommand(
            Command::new(CMD_UPLOAD)
                .about("Upload a profile picture (image, at most 5MB)")
                .arg(
                    Arg::new(ARG_FILE)
                        .help("Image file")
                        .required(true)
                        .action(ArgAction::Set)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new(CMD_DELETE_PICTURE).about("Remove the profile picture"))
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and forget the local session"))
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Send a password reset link to the signed-in user"),
        )
        .subcommand(
            Command::new(CMD_FORGOT_PASSWORD)
                .about("Send a password reset email")
                .long_about(
                    "Send a password reset email. Without --mail the address of the signed-in user is used.",
                )
                .arg(mail_arg()),
        )
}
