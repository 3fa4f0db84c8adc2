//! Hosted identity-provider client.
//!
//! Authentication, profile completion, and password reset are all handled on
//! the provider's hosted pages; the platform only initiates the flow and
//! consumes its outcome:
//!
//! 1. Generate an authorization URL with [`IdentityClient::authorize_url`]
//! 2. Redirect the visitor to the provider's sign-in page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code for tokens with [`IdentityClient::exchange_code`]
//! 5. Fetch the profile with [`IdentityClient::userinfo`]
//!
//! Staff accounts carry a `role` claim (`manager` / `admin`); customer
//! accounts carry none.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use adas_kitchen_core::StaffRole;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Identity-provider configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Base URL of the provider (no trailing slash).
    pub issuer_url: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Tokens returned by the code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// The provider's view of an authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable subject identifier.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Staff role claim; absent for customers.
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Interpret the role claim, `None` for customers and unknown values.
    #[must_use]
    pub fn staff_role(&self) -> Option<StaffRole> {
        self.role.as_deref().and_then(StaffRole::from_claim)
    }
}

/// Error payload shape used by the provider.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

// =============================================================================
// IdentityClient
// =============================================================================

/// Client for the hosted identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    issuer_url: String,
    client_id: String,
    client_secret: String,
}

impl IdentityClient {
    /// Create a new identity-provider client.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                issuer_url: config.issuer_url.trim_end_matches('/').to_owned(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_owned(),
            }),
        }
    }

    /// Authorization URL for the hosted sign-in page.
    #[must_use]
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.inner.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state)
            .finish();

        format!("{}/oauth/authorize?{query}", self.inner.issuer_url)
    }

    /// URL of the provider's hosted sign-out endpoint.
    #[must_use]
    pub fn logout_url(&self, post_logout_redirect: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.inner.client_id)
            .append_pair("return_to", post_logout_redirect)
            .finish();

        format!("{}/logout?{query}", self.inner.issuer_url)
    }

    /// URL of the provider's hosted password-reset flow.
    #[must_use]
    pub fn password_reset_url(&self, return_to: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.inner.client_id)
            .append_pair("return_to", return_to)
            .finish();

        format!("{}/password/reset?{query}", self.inner.issuer_url)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Provider` if the provider rejects the code.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, IdentityError> {
        let response = self
            .inner
            .client
            .post(format!("{}/oauth/token", self.inner.issuer_url))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", &self.inner.client_id),
                ("client_secret", &self.inner.client_secret),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the authenticated account's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Provider` if the token is rejected.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .inner
            .client
            .get(format!("{}/oauth/userinfo", self.inner.issuer_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Parse a provider response, mapping error payloads to `Provider` errors.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The provider uses the standard OAuth error shape when it can
            let message = match serde_json::from_str::<ProviderError>(&body) {
                Ok(ProviderError {
                    error,
                    error_description: Some(description),
                }) => format!("{error}: {description}"),
                Ok(ProviderError { error, .. }) => error,
                Err(_) => format!(
                    "HTTP {status}: {}",
                    body.chars().take(200).collect::<String>()
                ),
            };
            return Err(IdentityError::Provider(message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> IdentityClient {
        IdentityClient::new(&IdentityConfig {
            issuer_url: "https://id.example.com/".to_owned(),
            client_id: "ak-storefront".to_owned(),
            client_secret: SecretString::from("s3cr3t"),
        })
    }

    #[test]
    fn test_authorize_url_encodes_params() {
        let url = client().authorize_url("https://adaskitchen.example/auth/callback", "abc 123");

        assert!(url.starts_with("https://id.example.com/oauth/authorize?"));
        assert!(url.contains("client_id=ak-storefront"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fadaskitchen.example%2Fauth%2Fcallback"));
        assert!(url.contains("state=abc+123"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_logout_and_reset_urls() {
        let c = client();
        assert!(
            c.logout_url("https://adaskitchen.example/")
                .starts_with("https://id.example.com/logout?")
        );
        assert!(
            c.password_reset_url("https://adaskitchen.example/auth/login")
                .starts_with("https://id.example.com/password/reset?")
        );
    }

    #[test]
    fn test_staff_role_claim_mapping() {
        let mut profile = UserProfile {
            sub: "user-1".to_owned(),
            email: "chef@adaskitchen.example".to_owned(),
            name: None,
            role: Some("manager".to_owned()),
        };
        assert_eq!(profile.staff_role(), Some(StaffRole::Manager));

        profile.role = None;
        assert_eq!(profile.staff_role(), None);

        profile.role = Some("customer".to_owned());
        assert_eq!(profile.staff_role(), None);
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = IdentityConfig {
            issuer_url: "https://id.example.com".to_owned(),
            client_id: "ak".to_owned(),
            client_secret: SecretString::from("super-secret-value"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-value"));
    }
}
