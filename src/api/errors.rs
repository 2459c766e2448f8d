use thiserror::Error;

/// A call that produced no structured backend answer.
///
/// Backend refusals are not errors; they come back as
/// [`Reply::Rejected`](super::Reply::Rejected). Everything here means the
/// outcome is unknown and the user should simply try again.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}
