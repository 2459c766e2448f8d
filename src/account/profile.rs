//! Profile page: loading the signed-in user, picture management, logout and
//! password-reset requests.

use super::{Notice, Outcome, Route};
use crate::{
    api::{AuthApi, ProfilePicture, Reply, User},
    session::{SessionContext, Storage},
};
use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

/// Shown when the user has no picture of their own.
pub const DEFAULT_PROFILE_PICTURE: &str = "https://ik.imagekit.io/wskbkewsr/profile_picture/defualt%20profile%20pic.png?updatedAt=1748085952796";

const FETCH_FAILED: &str = "Failed to fetch profile";
const UPLOAD_FAILED: &str = "Failed to upload image";
const DELETE_FAILED: &str = "Failed to delete image";
const RESET_FAILED: &str = "Failed to send reset email";
const FORGOT_FAILED: &str = "Failed to send forgot password email";

/// What the profile page shows.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileCard {
    pub user: User,
    pub picture_url: String,
}

impl ProfileCard {
    #[must_use]
    pub fn new(user: User) -> Self {
        let picture_url = user
            .profile_picture_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_PROFILE_PICTURE)
            .to_string();
        Self { user, picture_url }
    }

    #[must_use]
    pub fn has_custom_picture(&self) -> bool {
        self.picture_url != DEFAULT_PROFILE_PICTURE
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProfileLoad {
    Ready(ProfileCard),
    /// The page cannot be shown; the outcome says why and where to go.
    Redirect(Outcome),
}

#[derive(Debug, Default)]
pub struct ProfileFlow {
    card: Option<ProfileCard>,
}

impl ProfileFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn card(&self) -> Option<&ProfileCard> {
        self.card.as_ref()
    }

    /// Entry point of the page. Without a cached user the caller is sent to
    /// login and nothing is requested.
    ///
    /// # Errors
    /// Returns an error if the session cache cannot be read.
    #[instrument(skip_all)]
    pub async fn open<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<ProfileLoad> {
        if !session
            .is_signed_in()
            .context("Failed to read session cache")?
        {
            debug!("no cached user, redirecting to login");
            self.card = None;
            return Ok(ProfileLoad::Redirect(
                Outcome::default().redirect_to(Route::Login),
            ));
        }
        self.fetch(api, session).await
    }

    /// Loads the user from the backend. The cache is only touched when the
    /// backend says the session is no longer valid.
    ///
    /// # Errors
    /// Returns an error if a stale session cannot be cleared.
    #[instrument(skip_all)]
    pub async fn fetch<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<ProfileLoad> {
        let load = match api.get_profile().await {
            Ok(Reply::Accepted { data, .. }) => {
                let card = ProfileCard::new(data.user);
                self.card = Some(card.clone());
                return Ok(ProfileLoad::Ready(card));
            }
            Ok(Reply::Rejected(rejection)) => {
                if rejection.is_unauthorized() {
                    info!(status = rejection.status, "session rejected, clearing cache");
                    session.clear().context("Failed to clear session cache")?;
                }
                Outcome::rejected(&rejection, FETCH_FAILED)
            }
            Err(err) => Outcome::unreachable(&err),
        };
        self.card = None;
        Ok(ProfileLoad::Redirect(load.redirect_to(Route::Login)))
    }

    /// Uploads a picture that already passed the local checks. On success the
    /// new URL is shown and written to the cached user.
    ///
    /// # Errors
    /// Returns an error if the cached user cannot be updated.
    #[instrument(skip_all)]
    pub async fn upload_picture<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
        picture: &ProfilePicture,
    ) -> Result<Outcome> {
        let outcome = match api.upload_profile_picture(picture).await {
            Ok(Reply::Accepted { message, data }) => {
                let url = data.url;
                match self.card.as_mut() {
                    Some(card) => {
                        card.user.profile_picture_url = Some(url.clone());
                        card.picture_url = url;
                        session
                            .store_user(&card.user)
                            .context("Failed to cache profile picture")?;
                    }
                    None => {
                        let cached = session
                            .update_user(|user| user.profile_picture_url = Some(url))
                            .context("Failed to cache profile picture")?;
                        if cached.is_none() {
                            warn!("picture uploaded without a cached user");
                        }
                    }
                }
                Outcome::success(message)
            }
            Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, UPLOAD_FAILED),
            Err(err) => Outcome::unreachable(&err),
        };
        Ok(outcome)
    }

    /// Removes the picture, then reloads the profile.
    ///
    /// # Errors
    /// Returns an error if the reload has to clear a stale session and cannot.
    #[instrument(skip_all)]
    pub async fn delete_picture<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<Outcome> {
        match api.delete_profile_picture().await {
            Ok(Reply::Accepted { message, .. }) => {
                let outcome = Outcome::success(message);
                Ok(match self.fetch(api, session).await? {
                    ProfileLoad::Ready(_) => outcome,
                    ProfileLoad::Redirect(redirect) => outcome.merge(redirect),
                })
            }
            Ok(Reply::Rejected(rejection)) => Ok(Outcome::rejected(&rejection, DELETE_FAILED)),
            Err(err) => Ok(Outcome::unreachable(&err)),
        }
    }

    /// Signs out. The local session is cleared and the caller sent to the
    /// landing page whatever the backend answered.
    ///
    /// # Errors
    /// Returns an error if the session cache cannot be cleared.
    #[instrument(skip_all)]
    pub async fn logout<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<Outcome> {
        let mut outcome = Outcome::default();
        match api.logout().await {
            Ok(Reply::Accepted { message, .. }) => {
                outcome = outcome.with(Notice::Success(message));
            }
            Ok(Reply::Rejected(rejection)) => {
                warn!(status = rejection.status, "backend refused logout: {}", rejection.message);
            }
            Err(err) => warn!("logout request failed: {err}"),
        }
        session.clear().context("Failed to clear session cache")?;
        self.card = None;
        Ok(outcome.redirect_to(Route::Landing))
    }

    /// Password reset for the signed-in user.
    #[instrument(skip_all)]
    pub async fn request_password_reset(&mut self, api: &dyn AuthApi) -> Outcome {
        match api.request_password_reset().await {
            Ok(Reply::Accepted { message, .. }) => Outcome::success(message),
            Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, RESET_FAILED),
            Err(err) => Outcome::unreachable(&err),
        }
    }

    /// Forgot-password email to the loaded user's address, or the cached
    /// user's when the profile has not been loaded.
    ///
    /// # Errors
    /// Returns an error if the session cache cannot be read.
    #[instrument(skip_all)]
    pub async fn forgot_password<S: Storage>(
        &mut self,
        api: &dyn AuthApi,
        session: &SessionContext<S>,
    ) -> Result<Outcome> {
        let mail = match &self.card {
            Some(card) => Some(card.user.email.clone()),
            None => session
                .current_user()
                .context("Failed to read session cache")?
                .map(|user| user.email),
        };
        let Some(mail) = mail else {
            return Ok(Outcome::error(FORGOT_FAILED).redirect_to(Route::Login));
        };

        Ok(match api.request_forgot_password(&mail).await {
            Ok(Reply::Accepted { message, .. }) => Outcome::success(message),
            Ok(Reply::Rejected(rejection)) => Outcome::rejected(&rejection, FORGOT_FAILED),
            Err(err) => Outcome::unreachable(&err),
        })
    }
}
