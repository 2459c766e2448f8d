//! HTTP client for the account API with a fixed timeout, a cookie store and a
//! single response normalization rule. Backend answers shaped
//! `{success, message, ...}` are returned as [`Reply`] values whatever their
//! status code; only calls without such a body fail with [`ApiError`].

use super::{
    errors::ApiError,
    types::{
        Ack, LoginForm, MailRequest, Rejection, RegistrationForm, Reply, SessionUser,
        UploadedPicture,
    },
    upload::{PICTURE_FIELD, ProfilePicture},
};
use crate::APP_USER_AGENT;
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    cookie::{CookieStore, Jar},
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};
use url::Url;

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://auth-cpgr.onrender.com/api/v2";
/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// One method per backend operation.
///
/// Account flows only talk to the backend through this trait.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Creates an account and triggers the verification email.
    async fn register(&self, form: &RegistrationForm) -> Result<Reply<Ack>, ApiError>;

    /// Sends the verification email again.
    async fn resend_verification(&self, request: &MailRequest) -> Result<Reply<Ack>, ApiError>;

    /// Signs in; the backend sets the session cookie and returns the user.
    async fn login(&self, form: &LoginForm) -> Result<Reply<SessionUser>, ApiError>;

    /// Fetches the signed-in user. Requires the session cookie.
    async fn get_profile(&self) -> Result<Reply<SessionUser>, ApiError>;

    async fn upload_profile_picture(
        &self,
        picture: &ProfilePicture,
    ) -> Result<Reply<UploadedPicture>, ApiError>;

    async fn delete_profile_picture(&self) -> Result<Reply<Ack>, ApiError>;

    async fn logout(&self) -> Result<Reply<Ack>, ApiError>;

    /// Password reset for an already signed-in user.
    async fn request_password_reset(&self) -> Result<Reply<Ack>, ApiError>;

    /// Password reset email for a user who cannot sign in.
    async fn request_forgot_password(&self, mail: &str) -> Result<Reply<Ack>, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed [`AuthApi`]. Every request carries the cookies the backend
/// has set so far; no authorization header is ever added.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("cookies", &"***")
            .finish()
    }
}

impl ApiClient {
    /// # Errors
    /// Returns [`ApiError::Config`] if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let raw = config.base_url.trim();
        let base_url = Url::parse(raw)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL {raw}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Unsupported API base URL scheme: {}",
                base_url.scheme()
            )));
        }

        let cookies = Arc::new(Jar::default());
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            cookies,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Cookie header the client would send to the API, if any cookie is set.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Seeds the cookie store from a header saved by [`Self::cookie_header`].
    pub fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
            self.cookies.add_cookie_str(pair, &self.base_url);
        }
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(self.base_url.as_str(), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Reply<T>, ApiError> {
        send(self.http.get(self.url(path)), "GET", path).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Reply<T>, ApiError> {
        send(self.http.delete(self.url(path)), "DELETE", path).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Reply<T>, ApiError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))?;
        let request = self
            .http
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        send(request, "POST", path).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    #[instrument(skip_all)]
    async fn register(&self, form: &RegistrationForm) -> Result<Reply<Ack>, ApiError> {
        self.post_json("/register", form).await
    }

    #[instrument(skip_all)]
    async fn resend_verification(&self, request: &MailRequest) -> Result<Reply<Ack>, ApiError> {
        self.post_json("/resend", request).await
    }

    #[instrument(skip_all)]
    async fn login(&self, form: &LoginForm) -> Result<Reply<SessionUser>, ApiError> {
        self.post_json("/login", form).await
    }

    #[instrument(skip_all)]
    async fn get_profile(&self) -> Result<Reply<SessionUser>, ApiError> {
        self.get("/me").await
    }

    #[instrument(skip_all, fields(file = picture.file_name(), bytes = picture.len()))]
    async fn upload_profile_picture(
        &self,
        picture: &ProfilePicture,
    ) -> Result<Reply<UploadedPicture>, ApiError> {
        let part = Part::bytes(picture.bytes().to_vec())
            .file_name(picture.file_name().to_string())
            .mime_str(picture.content_type())
            .map_err(|err| ApiError::Serialization(format!("Invalid content type: {err}")))?;
        let form = Form::new().part(PICTURE_FIELD, part);
        let request = self.http.post(self.url("/upload")).multipart(form);
        send(request, "POST", "/upload").await
    }

    #[instrument(skip_all)]
    async fn delete_profile_picture(&self) -> Result<Reply<Ack>, ApiError> {
        self.delete("/delete_profile_picture").await
    }

    #[instrument(skip_all)]
    async fn logout(&self) -> Result<Reply<Ack>, ApiError> {
        self.get("/logout").await
    }

    #[instrument(skip_all)]
    async fn request_password_reset(&self) -> Result<Reply<Ack>, ApiError> {
        self.get("/reset-password/request").await
    }

    #[instrument(skip_all)]
    async fn request_forgot_password(&self, mail: &str) -> Result<Reply<Ack>, ApiError> {
        let request = MailRequest {
            mail: mail.to_string(),
        };
        self.post_json("/forgot-password/request", &request).await
    }
}

/// Sends a request and normalizes whatever comes back.
async fn send<T: DeserializeOwned>(
    request: RequestBuilder,
    method: &str,
    path: &str,
) -> Result<Reply<T>, ApiError> {
    let response = request.send().await.map_err(|err| {
        warn!(method, path, "request failed: {err}");
        map_request_error(&err)
    })?;
    let reply = read_reply(response).await;
    match &reply {
        Ok(Reply::Accepted { .. }) => debug!(method, path, "accepted"),
        Ok(Reply::Rejected(rejection)) => {
            warn!(method, path, status = rejection.status, "rejected by backend");
        }
        Err(err) => warn!(method, path, "no structured reply: {err}"),
    }
    reply
}

async fn read_reply<T: DeserializeOwned>(response: Response) -> Result<Reply<T>, ApiError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|err| map_request_error(&err))?;
    decode_reply(status, &body)
}

/// Applies the normalization rule to a raw status and body.
///
/// # Errors
/// Returns [`ApiError::Http`] for unstructured error bodies and
/// [`ApiError::Parse`] for success bodies that do not carry the expected data.
pub fn decode_reply<T: DeserializeOwned>(status: u16, body: &str) -> Result<Reply<T>, ApiError> {
    let envelope = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(envelope)) => envelope,
        _ if (200..300).contains(&status) => {
            return Err(ApiError::Parse(
                "Failed to decode response: expected a JSON object".to_string(),
            ));
        }
        _ => {
            return Err(ApiError::Http {
                status,
                message: sanitize_body(body),
            });
        }
    };

    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let message = envelope_message(&envelope);

    if success {
        let data = serde_json::from_value(Value::Object(envelope))
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))?;
        Ok(Reply::Accepted { message, data })
    } else {
        Ok(Reply::Rejected(Rejection { status, message }))
    }
}

fn envelope_message(envelope: &Map<String, Value>) -> String {
    envelope
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Serialization(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
