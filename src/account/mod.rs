//! Account flows: the register, login and profile pages without a UI.
//!
//! A flow never renders anything. Each step returns an [`Outcome`] holding the
//! notices to show, where to go next and any field errors, and the caller
//! decides how to present them. Steps take `&mut self`, so a flow cannot have
//! two submissions in flight.

pub mod login;
pub mod profile;
pub mod register;
pub mod resend;

pub use login::{LoginFlow, forgot_password};
pub use profile::{DEFAULT_PROFILE_PICTURE, ProfileCard, ProfileFlow, ProfileLoad};
pub use register::{RegistrationFlow, resend_verification};
pub use resend::{RESEND_COOLDOWN_SECS, ResendCooldown, ResendState};

use crate::{
    api::{ApiError, Rejection},
    validation::ValidationErrors,
};
use std::fmt;
use tracing::warn;

/// Shown for every call that got no structured answer from the backend.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Info(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Pages a flow can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Profile,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Profile => "/profile",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    pub redirect: Option<Route>,
    pub errors: ValidationErrors,
}

impl Outcome {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::default().with(Notice::Success(message.into()))
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::default().with(Notice::Error(message.into()))
    }

    #[must_use]
    pub fn invalid(errors: ValidationErrors) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Error notice for a backend refusal.
    #[must_use]
    pub fn rejected(rejection: &Rejection, fallback: &str) -> Self {
        Self::error(rejection.message_or(fallback))
    }

    /// Error notice for a call that got no structured answer.
    #[must_use]
    pub fn unreachable(err: &ApiError) -> Self {
        warn!("account call failed: {err}");
        Self::error(NETWORK_ERROR_MESSAGE)
    }

    #[must_use]
    pub fn with(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    #[must_use]
    pub const fn redirect_to(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }

    /// Appends `other`'s notices and field errors; its redirect wins if set.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.notices.extend(other.notices);
        for (field, message) in other.errors.iter() {
            self.errors.insert(field, message);
        }
        if other.redirect.is_some() {
            self.redirect = other.redirect;
        }
        self
    }

    /// True when the step failed: an error notice or a field error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.errors.is_empty() || self.notices.iter().any(Notice::is_error)
    }
}
