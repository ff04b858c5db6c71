//! Google sign-in: implicit-flow authorize URL, callback parsing, userinfo
//! fetch and the on-disk session.
//!
//! DESIGN
//! ======
//! The browser flow hands the access token back in the redirect fragment
//! (`response_type=token`), so there is no code exchange and no client
//! secret. The CLI prints the authorize URL, the user pastes the final
//! redirect URL back, and `parse_callback` pulls the token out of it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_SCOPE: &str = "openid email profile";

/// Google OAuth configuration loaded from environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub client_id: String,
    pub redirect_uri: String,
}

impl GoogleConfig {
    /// Load from `GOOGLE_CLIENT_ID` and `GOOGLE_REDIRECT_URI`.
    /// Returns `None` if either is missing or blank (login is disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let present = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let client_id = present("GOOGLE_CLIENT_ID")?;
        let redirect_uri = present("GOOGLE_REDIRECT_URI")?;
        Some(Self { client_id, redirect_uri })
    }

    /// Build the Google authorization URL for the implicit flow.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidUrl`] if the endpoint cannot be encoded.
    pub fn authorize_url(&self) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "token"),
                ("scope", GOOGLE_SCOPE),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        Ok(url.into())
    }
}

/// Signed-in user, persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    picture: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("google oauth error: {0}")]
    Provider(String),
    #[error("received an authorization code instead of an access token; check the OAuth client type")]
    AuthorizationCode,
    #[error("no access token in callback url")]
    MissingToken,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("google api error: {0}")]
    GoogleApi(String),
    #[error("session file error: {0}")]
    SessionIo(#[from] io::Error),
    #[error("session file is not valid json: {0}")]
    SessionJson(#[from] serde_json::Error),
}

// =============================================================================
// CALLBACK
// =============================================================================

/// Extract the access token from the redirect URL.
///
/// The fragment is checked first. Only when it carries neither a token nor
/// an error does the query string get a look.
///
/// # Errors
///
/// Provider errors, a bare authorization code, or no token at all.
pub fn parse_callback(callback: &str) -> Result<String, AuthError> {
    let url = Url::parse(callback.trim()).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

    let mut params = fragment_params(&url);
    if !params.contains_key("access_token") && !params.contains_key("error") {
        params = query_params(&url);
        if params.contains_key("code") && !params.contains_key("access_token") {
            return Err(AuthError::AuthorizationCode);
        }
    }

    if let Some(error) = params.remove("error") {
        return Err(AuthError::Provider(error));
    }
    params
        .remove("access_token")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

fn query_params(url: &Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

fn fragment_params(url: &Url) -> HashMap<String, String> {
    // Fragments use the same form encoding as queries.
    let mut as_query = url.clone();
    as_query.set_query(url.fragment());
    query_params(&as_query)
}

// =============================================================================
// USERINFO
// =============================================================================

/// Fetch the signed-in Google user's profile.
///
/// # Errors
///
/// Returns [`AuthError::GoogleApi`] on transport failures, non-2xx responses
/// or an unexpected body.
pub async fn fetch_google_user(access_token: &str) -> Result<User, AuthError> {
    fetch_user_from(&reqwest::Client::new(), GOOGLE_USERINFO_URL, access_token).await
}

/// [`fetch_google_user`] against an explicit userinfo endpoint.
///
/// # Errors
///
/// Same as [`fetch_google_user`].
pub async fn fetch_user_from(client: &reqwest::Client, endpoint: &str, access_token: &str) -> Result<User, AuthError> {
    let resp = client
        .get(endpoint)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| AuthError::GoogleApi(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::GoogleApi(format!("{status}: {body}")));
    }

    let info = resp
        .json::<GoogleUserInfo>()
        .await
        .map_err(|e| AuthError::GoogleApi(e.to_string()))?;
    tracing::info!(user_id = %info.id, "google user fetched");

    Ok(User {
        id: info.id,
        name: info.name,
        email: info.email,
        picture: info.picture,
        access_token: access_token.to_owned(),
    })
}

// =============================================================================
// SESSION FILE
// =============================================================================

/// JSON file holding the signed-in [`User`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the saved user. A corrupt file is removed and reads as
    /// logged out.
    ///
    /// # Errors
    ///
    /// IO failures other than a missing file.
    pub fn load(&self) -> Result<Option<User>, AuthError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "discarding corrupt session file");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Serialization or write failures.
    pub fn save(&self, user: &User) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(user)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the saved session. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// IO failures other than a missing file.
    pub fn clear(&self) -> Result<bool, AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
