//! Identity-provider OAuth route handlers.
//!
//! Handles the hosted sign-in flow:
//! - Login: redirects to the provider's sign-in page (state in session)
//! - Callback: validates state, exchanges the code, stores the user, and
//!   runs the guest-cart merge hook exactly once
//! - Logout: clears the session user and hands off to the provider
//! - Password reset: redirect to the provider's hosted flow

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use adas_kitchen_core::{Email, UserId};

use crate::cart::{self, MergeOutcome, SessionSlot};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::routes::cart::load_store;
use crate::state::AppState;

/// Query parameters for the login redirect.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Local path to return to after sign-in (e.g. `/checkout`).
    pub return_to: Option<String>,
}

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically random URL-safe string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Only accept local paths as post-sign-in destinations.
fn sanitize_return_to(raw: Option<&str>) -> Option<String> {
    raw.filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .map(str::to_owned)
}

/// Initiate sign-in via the hosted identity provider.
///
/// Generates a state parameter, stores it (and the destination) in the
/// session, and redirects to the provider's authorization page.
///
/// # Route
///
/// `GET /auth/login`
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Response {
    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/cart?error=auth").into_response();
    }

    if let Some(return_to) = sanitize_return_to(query.return_to.as_deref()) {
        if let Err(e) = session.insert(session_keys::RETURN_TO, &return_to).await {
            tracing::error!("Failed to store return-to path in session: {}", e);
            return Redirect::to("/cart?error=auth").into_response();
        }
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    let auth_url = state.identity().authorize_url(&redirect_uri, &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code, stores
/// the signed-in user in the session, and merges any pending guest cart.
///
/// # Route
///
/// `GET /auth/callback`
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for OAuth errors from the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("Identity provider error: {} - {}", error, description);
        return Redirect::to("/cart?error=auth").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("OAuth callback missing code");
        return Redirect::to("/cart?error=auth").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("OAuth callback missing state");
        return Redirect::to("/cart?error=auth").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch");
        return Redirect::to("/cart?error=auth").into_response();
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    // Exchange the code for tokens (redirect URI must match the login request)
    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    let token = match state.identity().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange OAuth code: {}", e);
            return Redirect::to("/cart?error=auth").into_response();
        }
    };

    // Resolve the profile behind the token
    let profile = match state.identity().userinfo(&token.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch user profile: {}", e);
            return Redirect::to("/cart?error=auth").into_response();
        }
    };

    let email = match Email::parse(&profile.email) {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Provider returned an invalid email: {}", e);
            return Redirect::to("/cart?error=auth").into_response();
        }
    };

    let user = CurrentUser {
        id: UserId::new(profile.sub),
        email,
        name: profile.name,
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Redirect::to("/cart?error=auth").into_response();
    }
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!("customer authenticated");

    // Guest-cart merge hook: runs after every successful sign-in, and is a
    // no-op unless checkout parked a snapshot before the redirect
    let mut store = load_store(&state, &session).await;
    let pending = SessionSlot::pending(session.clone());
    match cart::load_and_merge(&pending, &mut store).await {
        MergeOutcome::Merged { item_count } => {
            tracing::info!(item_count, "merged pending guest cart");
        }
        MergeOutcome::NoPending => {}
    }

    // Send the visitor where they were headed (default: home)
    let destination = session
        .remove::<String>(session_keys::RETURN_TO)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| "/".to_owned());

    Redirect::to(&destination).into_response()
}

/// Sign out.
///
/// Clears the session user and redirects through the provider's sign-out
/// endpoint so the hosted session ends too.
///
/// # Route
///
/// `POST /auth/logout`
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {}", e);
    }
    clear_sentry_user();

    let post_logout = format!("{}/", state.config().base_url);
    Redirect::to(&state.identity().logout_url(&post_logout)).into_response()
}

/// Redirect to the provider's hosted password-reset flow.
///
/// # Route
///
/// `GET /auth/password-reset`
#[instrument(skip(state))]
pub async fn password_reset(State(state): State<AppState>) -> Response {
    let return_to = format!("{}/auth/login", state.config().base_url);
    Redirect::to(&state.identity().password_reset_url(&return_to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_string_length_and_charset() {
        let s = generate_random_string(32);
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_sanitize_return_to() {
        assert_eq!(
            sanitize_return_to(Some("/checkout")),
            Some("/checkout".to_owned())
        );
        assert_eq!(sanitize_return_to(Some("https://evil.example")), None);
        assert_eq!(sanitize_return_to(Some("//evil.example")), None);
        assert_eq!(sanitize_return_to(None), None);
    }
}
