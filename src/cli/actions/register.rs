use crate::{
    account::{self, RegistrationFlow},
    api::RegistrationForm,
    cli::{actions::report, globals::GlobalArgs},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
    pub mail: String,
    pub password: SecretString,
    /// Verification resends to perform after registering.
    pub resend: u32,
}

#[derive(Debug)]
pub struct ResendArgs {
    pub globals: GlobalArgs,
    pub mail: String,
}

/// Registers, then optionally waits out the cooldown and resends.
/// # Errors
/// Returns an error if registration or a resend fails.
pub async fn execute(args: Args) -> Result<()> {
    let (client, session) = args.globals.connect()?;

    let mut flow = RegistrationFlow::with_form(RegistrationForm {
        first_name: args.first_name,
        last_name: args.last_name,
        username: args.username,
        phone: args.phone,
        email: args.mail,
        password: args.password.expose_secret().to_string(),
    });

    report(&flow.submit(&client).await)?;

    for attempt in 1..=args.resend {
        println!(
            "Resend available in {}s",
            flow.cooldown().remaining()
        );
        flow.wait_for_resend().await;
        debug!(attempt, "resending verification email");
        report(&flow.resend(&client).await)?;
    }

    args.globals.persist_cookies(&client, &session)
}

/// # Errors
/// Returns an error if the email could not be sent.
pub async fn resend(args: ResendArgs) -> Result<()> {
    let (client, _) = args.globals.connect()?;
    report(&account::resend_verification(&client, &args.mail).await)
}
