use crate::{
    account::{self, LoginFlow, ProfileFlow},
    api::LoginForm,
    cli::{actions::report, globals::GlobalArgs},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub identifier: String,
    pub password: SecretString,
}

#[derive(Debug)]
pub struct ForgotArgs {
    pub globals: GlobalArgs,
    /// Falls back to the signed-in user's address.
    pub mail: Option<String>,
}

/// Signs in and saves the session for later commands.
/// # Errors
/// Returns an error if the backend refuses the login or cannot be reached.
pub async fn execute(args: Args) -> Result<()> {
    let (client, session) = args.globals.connect()?;

    let mut flow = LoginFlow::with_form(LoginForm {
        identifier: args.identifier,
        password: args.password.expose_secret().to_string(),
    });
    let outcome = flow.submit(&client, &session).await?;

    args.globals.persist_cookies(&client, &session)?;
    report(&outcome)
}

/// # Errors
/// Returns an error if the email could not be sent.
pub async fn forgot_password(args: ForgotArgs) -> Result<()> {
    let (client, session) = args.globals.connect()?;

    let outcome = match args.mail {
        Some(mail) => account::forgot_password(&client, &mail).await,
        None => {
            ProfileFlow::new()
                .forgot_password(&client, &session)
                .await?
        }
    };
    report(&outcome)
}
