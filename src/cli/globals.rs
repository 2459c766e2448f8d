use crate::{
    api::{ApiClient, ClientConfig},
    cli::commands::api::Options,
    session::{FileStorage, SessionContext},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{path::PathBuf, time::Duration};
use tracing::debug;
use url::Url;

#[derive(Clone)]
pub struct GlobalArgs {
    pub api_base_url: String,
    pub state_dir: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            api_base_url: options.base_url,
            state_dir: options.state_dir,
            timeout: options.timeout,
        }
    }

    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: self.timeout,
        }
    }

    /// API client and session cache, with the saved session cookie loaded into
    /// the client.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built or the state cannot be read.
    pub fn connect(&self) -> Result<(ApiClient, SessionContext<FileStorage>)> {
        let client = ApiClient::new(&self.client_config()).context("invalid API configuration")?;
        let session = SessionContext::new(FileStorage::new(&self.state_dir));
        if let Some(cookie) = session
            .cookie_header()
            .context("failed to read saved session")?
        {
            debug!("restoring saved session cookie");
            client.restore_cookies(cookie.expose_secret());
        }
        Ok((client, session))
    }

    /// Saves the client's cookies for the next run, as long as a user is still
    /// signed in locally.
    ///
    /// # Errors
    /// Returns an error if the cookie cannot be written.
    pub fn persist_cookies(
        &self,
        client: &ApiClient,
        session: &SessionContext<FileStorage>,
    ) -> Result<()> {
        if !session.is_signed_in()? {
            return Ok(());
        }
        if let Some(header) = client.cookie_header() {
            session
                .store_cookie_header(&SecretString::from(header))
                .context("failed to save session cookie")?;
        }
        Ok(())
    }
}

/// The URL with any password replaced.
fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => raw.to_string(),
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_base_url", &redact_url(&self.api_base_url))
            .field("state_dir", &self.state_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}
