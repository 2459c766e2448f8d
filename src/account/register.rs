//! Registration page: form, submit, then verification email resends.

use super::{Notice, Outcome, ResendCooldown, ResendState};
use crate::{
    api::{AuthApi, MailRequest, RegistrationForm, Reply},
    validation::{Field, ValidationErrors, validate_registration},
};
use tracing::{debug, info, instrument};

const CHECK_EMAIL: &str = "Please check your email for verification link";
const REGISTRATION_FAILED: &str = "Registration failed";
const RESEND_FAILED: &str = "Failed to resend email";

#[derive(Debug, Default)]
pub struct RegistrationFlow {
    form: RegistrationForm,
    errors: ValidationErrors,
    cooldown: ResendCooldown,
}

impl RegistrationFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a filled-in form.
    #[must_use]
    pub fn with_form(form: RegistrationForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn form(&self) -> &RegistrationForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub const fn cooldown(&self) -> &ResendCooldown {
        &self.cooldown
    }

    /// Registered and waiting for the email to be verified.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        !self.cooldown.is_idle()
    }

    /// Updates one field and clears its error. The resend cooldown is left alone.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            Field::FirstName => &mut self.form.first_name,
            Field::LastName => &mut self.form.last_name,
            Field::Username => &mut self.form.username,
            Field::Phone => &mut self.form.phone,
            Field::Email => &mut self.form.email,
            Field::Password => &mut self.form.password,
            Field::Identifier => return,
        };
        *slot = value;
        self.errors.clear_field(field);
    }

    /// Validates and submits the form. Does nothing once registered.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, api: &dyn AuthApi) -> Outcome {
        if self.is_registered() {
            debug!("already registered, ignoring submit");
            return Outcome::default();
        }

        self.errors = validate_registration(&self.form);
        if !self.errors.is_empty() {
            return Outcome::invalid(self.errors.clone());
        }

        match api.register(&self.form).await {
            Ok(Reply::Accepted { message, .. }) => {
                info!(username = %self.form.username, "registered");
                self.cooldown.start();
                Outcome::success(message).with(Notice::Info(CHECK_EMAIL.to_string()))
            }
            Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, REGISTRATION_FAILED),
            Err(err) => Outcome::unreachable(&err),
        }
    }

    /// Sends the verification email again. Does nothing unless the cooldown
    /// has run out.
    #[instrument(skip_all)]
    pub async fn resend(&mut self, api: &dyn AuthApi) -> Outcome {
        if !self.cooldown.can_resend() {
            debug!(state = ?self.cooldown.state(), "resend not available yet");
            return Outcome::default();
        }

        let outcome = resend_verification(api, &self.form.email).await;
        if !outcome.is_failure() {
            self.cooldown.start();
        }
        outcome
    }

    /// Back to editing the submitted form; resends are off until the next submit.
    pub fn edit(&mut self) {
        self.cooldown.reset();
    }

    /// One second of the resend countdown.
    pub fn tick(&mut self) -> ResendState {
        self.cooldown.tick()
    }

    /// Waits out the resend countdown.
    pub async fn wait_for_resend(&mut self) {
        self.cooldown.run().await;
    }
}

/// Sends the verification email for `mail`, without any cooldown.
#[instrument(skip_all)]
pub async fn resend_verification(api: &dyn AuthApi, mail: &str) -> Outcome {
    let request = MailRequest {
        mail: mail.to_string(),
    };
    match api.resend_verification(&request).await {
        Ok(Reply::Accepted { message, .. }) => Outcome::success(message),
        Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, RESEND_FAILED),
        Err(err) => Outcome::unreachable(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{
        NETWORK_ERROR_MESSAGE, RESEND_COOLDOWN_SECS, test_support::FakeApi,
    };
    use crate::api::Ack;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            phone: "+44 (0)20 7946-0958".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc12345".to_string(),
        }
    }

    fn tick_out(flow: &mut RegistrationFlow) {
        for _ in 0..RESEND_COOLDOWN_SECS {
            flow.tick();
        }
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let api = FakeApi::default();
        let mut flow = RegistrationFlow::new();
        flow.set_field(Field::Email, "not-an-email");

        let outcome = flow.submit(&api).await;
        assert_eq!(api.register.calls(), 0);
        assert!(outcome.errors.contains(Field::Email));
        assert!(outcome.errors.contains(Field::FirstName));
        assert_eq!(flow.errors(), &outcome.errors);
        assert!(outcome.notices.is_empty());

        flow.set_field(Field::Email, "ada@example.com");
        assert!(!flow.errors().contains(Field::Email));
        assert!(flow.errors().contains(Field::FirstName));
    }

    #[tokio::test]
    async fn accepted_registration_starts_cooldown() {
        let api = FakeApi::default();
        api.register.accept("User registered successfully", Ack {});
        let mut flow = RegistrationFlow::with_form(valid_form());

        let outcome = flow.submit(&api).await;
        assert_eq!(
            outcome.notices,
            vec![
                Notice::Success("User registered successfully".to_string()),
                Notice::Info(CHECK_EMAIL.to_string()),
            ]
        );
        assert!(flow.is_registered());
        assert_eq!(flow.cooldown().remaining(), RESEND_COOLDOWN_SECS);

        // submitting again while registered is a no-op
        let again = flow.submit(&api).await;
        assert_eq!(again, Outcome::default());
        assert_eq!(api.register.calls(), 1);
    }

    #[tokio::test]
    async fn rejected_registration_shows_backend_message() {
        let api = FakeApi::default();
        api.register.reject(409, "Username already taken");
        api.register.reject(400, "");
        api.register.fail();
        let mut flow = RegistrationFlow::with_form(valid_form());

        let outcome = flow.submit(&api).await;
        assert_eq!(outcome.notices, vec![Notice::Error("Username already taken".to_string())]);
        let outcome = flow.submit(&api).await;
        assert_eq!(outcome.notices, vec![Notice::Error(REGISTRATION_FAILED.to_string())]);
        let outcome = flow.submit(&api).await;
        assert_eq!(outcome.notices, vec![Notice::Error(NETWORK_ERROR_MESSAGE.to_string())]);
        assert!(!flow.is_registered());
    }

    #[tokio::test]
    async fn resend_waits_for_cooldown() {
        let api = FakeApi::default();
        api.register.accept("ok", Ack {});
        api.resend.accept("Verification email sent", Ack {});
        let mut flow = RegistrationFlow::with_form(valid_form());
        flow.submit(&api).await;

        assert_eq!(flow.resend(&api).await, Outcome::default());
        assert_eq!(api.resend.calls(), 0);

        // ordinary edits leave the countdown alone
        flow.set_field(Field::FirstName, "Augusta");
        assert_eq!(flow.cooldown().remaining(), RESEND_COOLDOWN_SECS);

        tick_out(&mut flow);
        assert!(flow.cooldown().can_resend());
        let outcome = flow.resend(&api).await;
        assert_eq!(outcome.notices, vec![Notice::Success("Verification email sent".to_string())]);
        assert_eq!(api.mails(), vec!["ada@example.com".to_string()]);
        assert_eq!(flow.cooldown().remaining(), RESEND_COOLDOWN_SECS);
    }

    #[tokio::test]
    async fn failed_resend_keeps_control_enabled() {
        let api = FakeApi::default();
        api.register.accept("ok", Ack {});
        api.resend.reject(429, "");
        let mut flow = RegistrationFlow::with_form(valid_form());
        flow.submit(&api).await;
        tick_out(&mut flow);

        let outcome = flow.resend(&api).await;
        assert_eq!(outcome.notices, vec![Notice::Error(RESEND_FAILED.to_string())]);
        assert!(flow.cooldown().can_resend());
    }

    #[tokio::test]
    async fn edit_returns_to_form() {
        let api = FakeApi::default();
        api.register.accept("ok", Ack {});
        api.register.accept("ok again", Ack {});
        let mut flow = RegistrationFlow::with_form(valid_form());
        flow.submit(&api).await;

        flow.edit();
        assert!(!flow.is_registered());
        assert_eq!(flow.resend(&api).await, Outcome::default());

        flow.set_field(Field::Email, "augusta@example.com");
        flow.submit(&api).await;
        assert_eq!(api.register.calls(), 2);
        assert!(flow.is_registered());
    }

    #[tokio::test(start_paused = true)]
    async fn resend_enabled_after_sixty_seconds() {
        let api = FakeApi::default();
        api.register.accept("ok", Ack {});
        let mut flow = RegistrationFlow::with_form(valid_form());
        flow.submit(&api).await;

        let started = tokio::time::Instant::now();
        flow.wait_for_resend().await;
        assert_eq!(started.elapsed(), std::time::Duration::from_secs(60));
        assert!(flow.cooldown().can_resend());
    }
}
