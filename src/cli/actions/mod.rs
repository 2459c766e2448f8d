pub mod login;
pub mod profile;
pub mod register;

// Internal "interpreter" for `Action`.
mod run;

use crate::account::{Notice, Outcome};
use anyhow::{Result, anyhow};
use std::io::{self, Write};

#[derive(Debug)]
pub enum Action {
    Register(register::Args),
    Resend(register::ResendArgs),
    Login(login::Args),
    ForgotPassword(login::ForgotArgs),
    Profile(profile::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Writes notices and field errors: errors to `err`, everything else to `out`.
fn render(outcome: &Outcome, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    for notice in &outcome.notices {
        match notice {
            Notice::Success(text) | Notice::Info(text) => writeln!(out, "{text}")?,
            Notice::Error(text) => writeln!(err, "{text}")?,
        }
    }
    for (field, message) in outcome.errors.iter() {
        writeln!(err, "{field}: {message}")?;
    }
    Ok(())
}

/// Prints an outcome and turns a failed step into an error.
pub(crate) fn report(outcome: &Outcome) -> Result<()> {
    render(outcome, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    if !outcome.errors.is_empty() {
        Err(anyhow!("invalid input"))
    } else if outcome.is_failure() {
        Err(anyhow!("request failed"))
    } else {
        Ok(())
    }
}
