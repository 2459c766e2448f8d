//! Request and response payloads for the account API. Field names follow the
//! backend's camelCase wire format; forms carry passwords, so their `Debug`
//! output is redacted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(rename = "phNum")]
    pub phone: String,
    #[serde(rename = "mail")]
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("phone", &self.phone)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}

/// Body of the resend and forgot-password requests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailRequest {
    pub mail: String,
}

/// User record returned by login and `/me`.
///
/// The record is owned by the backend; fields this client does not know about
/// are kept in `extra` so the cached copy round-trips unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "mail", default)]
    pub email: String,
    #[serde(rename = "phNum", default)]
    pub phone: String,
    #[serde(rename = "isVerify", default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Success payload of login and `/me`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SessionUser {
    pub user: User,
}

/// Success payload of the picture upload.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct UploadedPicture {
    pub url: String,
}

/// Success payload of endpoints that only answer with `{success, message}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Ack {}

/// A backend refusal: the body said `success: false` (or nothing at all about
/// success). The message is shown to the user verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub message: String,
}

impl Rejection {
    /// The backend message, or `fallback` when the backend sent none.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.message.trim().is_empty() {
            fallback
        } else {
            &self.message
        }
    }

    /// The backend no longer recognizes the session cookie.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

/// A structured answer from the backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    Accepted { message: String, data: T },
    Rejected(Rejection),
}

impl<T> Reply<T> {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Accepted { message, .. } => message,
            Self::Rejected(rejection) => &rejection.message,
        }
    }
}
