//! Login page and its forgot-password dialog.

use super::{Outcome, Route};
use crate::{
    api::{AuthApi, LoginForm, Reply},
    session::{SessionContext, Storage},
    validation::{Field, ValidationErrors, validate_email, validate_login},
};
use anyhow::{Context, Result};
use tracing::{info, instrument};

const LOGIN_FAILED: &str = "Login failed";
const FORGOT_FAILED: &str = "Failed to send password reset email";

#[derive(Debug, Default)]
pub struct LoginFlow {
    form: LoginForm,
    errors: ValidationErrors,
}

impl LoginFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_form(form: LoginForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn form(&self) -> &LoginForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Updates the identifier or password and clears its error.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Identifier => self.form.identifier = value.into(),
            Field::Password => self.form.password = value.into(),
            _ => return,
        }
        self.errors.clear_field(field);
    }

    /// Signs in. On success the cached user is replaced by exactly the user the
    /// backend returned and the caller is sent to the profile page.
    ///
    /// # Errors
    /// Returns an error if the signed-in user cannot be cached.
    #[instrument(skip_all)]
    pub async fn submit<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<Outcome> {
        self.errors = validate_login(&self.form);
        if !self.errors.is_empty() {
            return Ok(Outcome::invalid(self.errors.clone()));
        }

        let outcome = match api.login(&self.form).await {
            Ok(Reply::Accepted { message, data }) => {
                session
                    .store_user(&data.user)
                    .context("Failed to cache signed-in user")?;
                info!(username = %data.user.username, "signed in");
                Outcome::success(message).redirect_to(Route::Profile)
            }
            Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, LOGIN_FAILED),
            Err(err) => Outcome::unreachable(&err),
        };
        Ok(outcome)
    }
}

/// Asks for a password reset email for an account that cannot sign in. The
/// address is sent as entered once it passes the email check.
#[instrument(skip_all)]
pub async fn forgot_password(api: &dyn AuthApi, email: &str) -> Outcome {
    if let Some(message) = validate_email(email) {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::Email, message);
        return Outcome::invalid(errors);
    }

    match api.request_forgot_password(email).await {
        Ok(Reply::Accepted { message, .. }) => Outcome::success(message),
        Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, FORGOT_FAILED),
        Err(err) => Outcome::unreachable(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{
        NETWORK_ERROR_MESSAGE, Notice,
        test_support::{FakeApi, session_user, user},
    };
    use crate::api::Ack;
    use crate::session::MemoryStorage;

    fn flow(identifier: &str, password: &str) -> LoginFlow {
        LoginFlow::with_form(LoginForm {
            identifier: identifier.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_replaces_cached_user() -> Result<()> {
        let api = FakeApi::default();
        api.login.accept("Login successful", session_user("ada_l"));
        let session = SessionContext::new(MemoryStorage::new());
        session.store_user(&user("someone_else"))?;

        let outcome = flow("ada_l", "abc123").submit(&api, &session).await?;
        assert_eq!(outcome.notices, vec![Notice::Success("Login successful".to_string())]);
        assert_eq!(outcome.redirect, Some(Route::Profile));
        assert_eq!(session.current_user()?, Some(user("ada_l")));
        Ok(())
    }

    #[tokio::test]
    async fn short_password_is_caught_locally() -> Result<()> {
        let api = FakeApi::default();
        let session = SessionContext::new(MemoryStorage::new());
        let mut flow = flow("ab", "12345");

        let outcome = flow.submit(&api, &session).await?;
        assert_eq!(api.login.calls(), 0);
        assert_eq!(
            outcome.errors.get(Field::Identifier),
            Some("Please enter a valid email or username")
        );
        assert_eq!(
            outcome.errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );

        flow.set_field(Field::Password, "123456");
        assert!(!flow.errors().contains(Field::Password));
        assert!(flow.errors().contains(Field::Identifier));
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_leaves_cache_alone() -> Result<()> {
        let api = FakeApi::default();
        api.login.reject(401, "Invalid credentials");
        api.login.reject(401, "");
        api.login.fail();
        let session = SessionContext::new(MemoryStorage::new());
        session.store_user(&user("ada_l"))?;
        let mut flow = flow("ada_l", "wrong-pass");

        let outcome = flow.submit(&api, &session).await?;
        assert_eq!(outcome.notices, vec![Notice::Error("Invalid credentials".to_string())]);
        assert_eq!(outcome.redirect, None);
        let outcome = flow.submit(&api, &session).await?;
        assert_eq!(outcome.notices, vec![Notice::Error(LOGIN_FAILED.to_string())]);
        let outcome = flow.submit(&api, &session).await?;
        assert_eq!(outcome.notices, vec![Notice::Error(NETWORK_ERROR_MESSAGE.to_string())]);

        assert_eq!(session.current_user()?, Some(user("ada_l")));
        Ok(())
    }

    #[tokio::test]
    async fn forgot_password_validates_email_first() {
        let api = FakeApi::default();
        let outcome = forgot_password(&api, "  ").await;
        assert_eq!(outcome.errors.get(Field::Email), Some("Email is required"));
        let outcome = forgot_password(&api, "ada@").await;
        assert_eq!(
            outcome.errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(api.forgot.calls(), 0);
    }

    #[tokio::test]
    async fn forgot_password_reports_backend_answer() {
        let api = FakeApi::default();
        api.forgot.accept("Password reset email sent", Ack {});
        api.forgot.reject(404, "");

        let outcome = forgot_password(&api, "ada@example.com").await;
        assert_eq!(
            outcome.notices,
            vec![Notice::Success("Password reset email sent".to_string())]
        );
        let outcome = forgot_password(&api, "ada@example.com").await;
        assert_eq!(outcome.notices, vec![Notice::Error(FORGOT_FAILED.to_string())]);
        assert_eq!(api.mails(), vec!["ada@example.com".to_string(); 2]);
    }

    #[tokio::test]
    async fn forgot_password_sends_address_as_entered() {
        let api = FakeApi::default();
        api.forgot.accept("Password reset email sent", Ack {});

        let outcome = forgot_password(&api, " ada@example.com ").await;
        assert!(!outcome.is_failure());
        assert_eq!(api.mails(), vec![" ada@example.com ".to_string()]);
    }
}
