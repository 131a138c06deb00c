// src/services/oauth.rs
//! OAuth provider clients for Google and Facebook.
//!
//! Both providers follow the same shape: exchange the authorization code the
//! provider redirected back with for an access token, then fetch the profile
//! (provider user id + email) with that token. The callback handlers consume
//! the combined result as a `ProviderProfile`.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth flow failed: {0}")]
    ExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Identity provider tag. Email is the cross-provider identity key; this tag
/// only selects which identity block gets populated on first login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }
}

/// Per-provider OAuth application credentials, loaded from the environment
/// at startup.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// What an OAuth callback resolves to: enough to find-or-create a local user
/// and populate the calling provider's identity block.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_ttl: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
}

// ============================================================================
// Google
// ============================================================================

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client: Client,
    config: OAuthConfig,
}

impl GoogleOAuth {
    pub fn new(client: Client, config: OAuthConfig) -> Self {
        Self { client, config }
    }

    /// Authorization URL the browser is sent to for the consent screen.
    pub fn authorization_url(&self) -> String {
        let scope = "openid email profile";
        format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(scope)
        )
    }

    /// Exchange the callback code for tokens and resolve the profile.
    pub async fn authenticate(&self, code: &str) -> Result<ProviderProfile, OAuthError> {
        let tokens = self.exchange_code(code).await?;
        let (provider_user_id, email) = self.fetch_profile(&tokens.access_token).await?;

        Ok(ProviderProfile {
            provider: Provider::Google,
            provider_user_id,
            email,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_ttl: tokens.expires_in,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging Google authorization code for tokens");

        let response = self
            .client
            .post("https://oauth2.googleapis.com/token")
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Google token exchange failed");
            return Err(OAuthError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<(String, String), OAuthError> {
        #[derive(Deserialize)]
        struct UserInfo {
            id: String,
            email: String,
        }

        let response = self
            .client
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuthError::ProfileFailed(
                "Failed to get Google user info".to_string(),
            ));
        }

        let info = response
            .json::<UserInfo>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        Ok((info.id, info.email))
    }
}

// ============================================================================
// Facebook
// ============================================================================

#[derive(Debug, Clone)]
pub struct FacebookOAuth {
    client: Client,
    config: OAuthConfig,
}

impl FacebookOAuth {
    pub fn new(client: Client, config: OAuthConfig) -> Self {
        Self { client, config }
    }

    pub fn authorization_url(&self) -> String {
        format!(
            "https://www.facebook.com/v12.0/dialog/oauth?client_id={}&redirect_uri={}&scope=email",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri)
        )
    }

    pub async fn authenticate(&self, code: &str) -> Result<ProviderProfile, OAuthError> {
        let tokens = self.exchange_code(code).await?;
        let (provider_user_id, email) = self.fetch_profile(&tokens.access_token).await?;

        Ok(ProviderProfile {
            provider: Provider::Facebook,
            provider_user_id,
            email,
            access_token: tokens.access_token,
            // Facebook's code exchange never issues a refresh token
            refresh_token: None,
            token_ttl: tokens.expires_in,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        debug!("Exchanging Facebook authorization code for tokens");

        let response = self
            .client
            .get("https://graph.facebook.com/v12.0/oauth/access_token")
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Facebook token exchange failed");
            return Err(OAuthError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<(String, String), OAuthError> {
        #[derive(Deserialize)]
        struct UserInfo {
            id: String,
            email: String,
        }

        let response = self
            .client
            .get("https://graph.facebook.com/me")
            .query(&[("fields", "id,email"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OAuthError::ProfileFailed(
                "Failed to get Facebook user info".to_string(),
            ));
        }

        let info = response
            .json::<UserInfo>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        Ok((info.id, info.email))
    }
}
