//! Checkout route handlers.
//!
//! Checkout is where the guest-cart transfer begins: an unauthenticated
//! visitor's cart is snapshotted to the pending slot and the visitor is
//! sent to the hosted sign-in page with `/checkout` as the destination.
//! If that snapshot cannot be written the redirect is ABORTED - silently
//! dropping the cart would lose the order.
//!
//! A signed-in visitor's cart is availability-reconciled and the available
//! lines become an order document; payment is settled out-of-band.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use adas_kitchen_backend::docstore::{OrderLine, OrderRecord};
use adas_kitchen_core::OrderStatus;

use crate::cart::{CartLineItem, SessionSlot, save_pending};
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::routes::cart::{load_store, reconcile_against_catalog};
use crate::state::AppState;

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub reference: Option<String>,
}

/// Query parameters for the confirmation page.
#[derive(Debug, Deserialize)]
pub struct ConfirmationQuery {
    pub reference: Option<String>,
}

/// Short human-readable order reference for the kitchen.
fn order_reference() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("AK-{}", id.chars().take(8).collect::<String>())
}

/// Start checkout.
///
/// Guests get their cart snapshotted and are redirected to sign-in;
/// signed-in visitors place the order directly.
#[instrument(skip(state, session, user))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Response {
    let store = load_store(&state, &session).await;
    if store.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    match user {
        Some(user) => place_order(&state, &session, user, store.items())
            .await
            .into_response(),
        None => hold_cart_for_sign_in(&session, store.items()).await,
    }
}

/// Snapshot the guest cart and hand off to the sign-in flow.
async fn hold_cart_for_sign_in(session: &Session, lines: &[CartLineItem]) -> Response {
    let pending = SessionSlot::pending(session.clone());
    match save_pending(&pending, lines).await {
        Ok(()) => Redirect::to("/auth/login?return_to=/checkout").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to save pending cart, aborting checkout redirect");
            Redirect::to("/cart?error=pending").into_response()
        }
    }
}

/// Reconcile availability, write the order document, and clear the cart.
async fn place_order(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    lines: &[CartLineItem],
) -> Result<Response, AppError> {
    let (reconciled, _stale) = reconcile_against_catalog(state, lines).await;
    if reconciled.available.is_empty() {
        // Everything in the cart is unavailable; send the visitor back to act on it
        return Ok(Redirect::to("/cart").into_response());
    }

    let policy = &state.config().cart;
    let record = OrderRecord {
        customer_email: user.email.to_string(),
        reference: order_reference(),
        lines: reconciled
            .available
            .iter()
            .map(|line| OrderLine {
                menu_item_id: line.id.clone(),
                name: line.name.clone(),
                unit_price: line.price,
                quantity: line.quantity,
            })
            .collect(),
        subtotal: reconciled.subtotal(),
        delivery_fee: reconciled.delivery_fee(policy),
        total: reconciled.total(),
        status: OrderStatus::Pending,
        placed_at: Utc::now(),
    };

    let order = state.docstore().place_order(&record).await?;
    tracing::info!(reference = %order.reference, order_id = %order.id, "order placed");

    // The order is in; the cart's job is done
    let mut store = load_store(state, session).await;
    store.clear().await;

    Ok(Redirect::to(&format!(
        "/checkout/confirmation?reference={}",
        order.reference
    ))
    .into_response())
}

/// Display the order-placed page.
#[instrument]
pub async fn confirmation(Query(query): Query<ConfirmationQuery>) -> ConfirmationTemplate {
    ConfirmationTemplate {
        reference: query.reference,
    }
}
