//! Session context: the one place that reads and writes the cached user record
//! and the backend session cookie.
//!
//! The user record is a display cache. It is written on login and on profile
//! updates and removed on logout; the backend cookie decides whether a call is
//! authenticated. Nothing here tracks expiry.

mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::api::User;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key of the cached user record.
pub const USER_KEY: &str = "user";
/// Storage key of the saved `Cookie` header for the API origin.
pub const COOKIE_KEY: &str = "session_cookie";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("session storage lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub struct SessionContext<S> {
    storage: S,
}

impl<S: Storage> SessionContext<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The cached user, if any. A record that no longer parses is treated as
    /// absent.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub fn current_user(&self) -> Result<Option<User>, SessionError> {
        let Some(raw) = self.storage.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!("ignoring unreadable cached user record: {err}");
                Ok(None)
            }
        }
    }

    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub fn is_signed_in(&self) -> Result<bool, SessionError> {
        Ok(self.current_user()?.is_some())
    }

    /// Overwrites the cached user with `user`.
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded or written.
    pub fn store_user(&self, user: &User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &raw)?;
        debug!(username = %user.username, "cached user record");
        Ok(())
    }

    /// Applies `update` to the cached user and writes it back. Returns `None`
    /// without writing when nothing is cached.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or written.
    pub fn update_user(
        &self,
        update: impl FnOnce(&mut User),
    ) -> Result<Option<User>, SessionError> {
        let Some(mut user) = self.current_user()? else {
            return Ok(None);
        };
        update(&mut user);
        self.store_user(&user)?;
        Ok(Some(user))
    }

    /// Forgets the cached user and the saved cookie.
    ///
    /// # Errors
    /// Returns an error if either entry cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove(USER_KEY)?;
        self.storage.remove(COOKIE_KEY)?;
        debug!("cleared session cache");
        Ok(())
    }

    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub fn cookie_header(&self) -> Result<Option<SecretString>, SessionError> {
        let Some(raw) = self.storage.get(COOKIE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(header) if !header.trim().is_empty() => Ok(Some(SecretString::from(header))),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!("ignoring unreadable saved cookie: {err}");
                Ok(None)
            }
        }
    }

    /// # Errors
    /// Returns an error if the header cannot be written.
    pub fn store_cookie_header(&self, header: &SecretString) -> Result<(), SessionError> {
        let raw = serde_json::to_string(header.expose_secret())?;
        self.storage.set(COOKIE_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    fn user() -> Result<User> {
        Ok(serde_json::from_value(json!({
            "username": "ada_l",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "mail": "ada@example.com",
            "phNum": "0123456789",
            "isVerify": false,
            "role": "member"
        }))?)
    }

    #[test]
    fn store_then_read_user() -> Result<()> {
        let session = SessionContext::new(MemoryStorage::new());
        assert!(!session.is_signed_in()?);

        let user = user()?;
        session.store_user(&user)?;
        assert_eq!(session.current_user()?, Some(user));
        assert!(session.is_signed_in()?);
        Ok(())
    }

    #[test]
    fn corrupt_record_reads_as_signed_out() -> Result<()> {
        let session = SessionContext::new(MemoryStorage::new());
        session.storage().set(USER_KEY, "{not json")?;
        assert_eq!(session.current_user()?, None);
        Ok(())
    }

    #[test]
    fn update_user_writes_back() -> Result<()> {
        let session = SessionContext::new(MemoryStorage::new());
        assert_eq!(session.update_user(|u| u.verified = true)?, None);

        session.store_user(&user()?)?;
        let updated = session.update_user(|u| {
            u.profile_picture_url = Some("https://cdn.example.com/ada.png".to_string());
        })?;
        assert!(updated.is_some());
        let cached = session.current_user()?;
        assert_eq!(
            cached.and_then(|u| u.profile_picture_url).as_deref(),
            Some("https://cdn.example.com/ada.png")
        );
        Ok(())
    }

    #[test]
    fn clear_forgets_user_and_cookie() -> Result<()> {
        let session = SessionContext::new(MemoryStorage::new());
        session.store_user(&user()?)?;
        session.store_cookie_header(&SecretString::from("sid=abc123"))?;
        assert_eq!(
            session.cookie_header()?.map(|c| c.expose_secret().to_string()),
            Some("sid=abc123".to_string())
        );

        session.clear()?;
        assert_eq!(session.current_user()?, None);
        assert!(session.cookie_header()?.is_none());
        Ok(())
    }

    #[test]
    fn file_backed_session_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        SessionContext::new(FileStorage::new(dir.path())).store_user(&user()?)?;

        let reopened = SessionContext::new(FileStorage::new(dir.path()));
        assert_eq!(reopened.current_user()?.map(|u| u.username), Some("ada_l".to_string()));
        Ok(())
    }
}
