use crate::cli::actions::{Action, login, profile, register};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Register(args) => register::execute(args).await,
        Action::Resend(args) => register::resend(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::ForgotPassword(args) => login::forgot_password(args).await,
        Action::Profile(args) => profile::execute(args).await,
    }
}
