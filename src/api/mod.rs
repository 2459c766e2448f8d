//! Account API access: request/response types, the HTTP client and upload checks.
//!
//! Every call goes to the configured base URL with the session cookie attached
//! and a fixed timeout. A response body shaped `{success, message, ...}` is
//! always handed back as a [`Reply`], accepted or rejected; an [`ApiError`]
//! means no such body was received and the outcome is unknown.

pub mod client;
pub mod errors;
pub mod types;
pub mod upload;

pub use client::{
    ApiClient, AuthApi, ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT, decode_reply,
};
pub use errors::ApiError;
pub use types::{
    Ack, LoginForm, MailRequest, Rejection, RegistrationForm, Reply, SessionUser, UploadedPicture,
    User,
};
pub use upload::{MAX_PICTURE_BYTES, ProfilePicture, UploadRejection, check_picture};
