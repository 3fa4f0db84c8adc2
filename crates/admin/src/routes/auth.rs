//! Staff OAuth route handlers.
//!
//! Same hosted sign-in flow as the storefront, with one addition: the
//! callback rejects any account whose profile lacks a staff role claim.
//! Customers can hold perfectly valid provider accounts without ever
//! reaching a dashboard session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use adas_kitchen_core::{Email, UserId};

use crate::filters;
use crate::middleware::{clear_current_staff, set_current_staff};
use crate::models::{CurrentStaff, session_keys};
use crate::state::AppState;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Forbidden page shown to accounts without a staff role.
#[derive(Template, WebTemplate)]
#[template(path = "forbidden.html")]
pub struct ForbiddenTemplate {
    pub email: String,
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

/// Initiate staff sign-in via the hosted identity provider.
///
/// # Route
///
/// `GET /auth/login`
#[instrument(skip(state, session))]
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/").into_response();
    }

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    let auth_url = state.identity().authorize_url(&redirect_uri, &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback with the staff-role gate.
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
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("Identity provider error: {} - {}", error, description);
        return Redirect::to("/auth/login").into_response();
    }

    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        tracing::warn!("OAuth callback missing code or state");
        return Redirect::to("/auth/login").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch");
        return Redirect::to("/auth/login").into_response();
    }

    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    let redirect_uri = format!("{}/auth/callback", state.config().base_url);
    let token = match state.identity().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange OAuth code: {}", e);
            return Redirect::to("/auth/login").into_response();
        }
    };

    let profile = match state.identity().userinfo(&token.access_token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to fetch staff profile: {}", e);
            return Redirect::to("/auth/login").into_response();
        }
    };

    // The role gate: no staff claim, no session
    let Some(role) = profile.staff_role() else {
        tracing::warn!(sub = %profile.sub, "account without staff role tried to sign in");
        return ForbiddenTemplate {
            email: profile.email,
        }
        .into_response();
    };

    let email = match Email::parse(&profile.email) {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Provider returned an invalid email: {}", e);
            return Redirect::to("/auth/login").into_response();
        }
    };

    let staff = CurrentStaff {
        id: UserId::new(profile.sub),
        email,
        name: profile.name,
        role,
    };

    if let Err(e) = set_current_staff(&session, &staff).await {
        tracing::error!("Failed to store staff member in session: {}", e);
        return Redirect::to("/auth/login").into_response();
    }

    tracing::info!(role = role.as_str(), "staff member authenticated");
    Redirect::to("/").into_response()
}

/// Sign out.
///
/// # Route
///
/// `POST /auth/logout`
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Err(e) = clear_current_staff(&session).await {
        tracing::error!("Failed to clear session staff member: {}", e);
    }

    let post_logout = format!("{}/", state.config().base_url);
    Redirect::to(&state.identity().logout_url(&post_logout)).into_response()
}
