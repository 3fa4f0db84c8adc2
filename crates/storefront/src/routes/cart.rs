//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation responds with an `HX-Trigger: cart-updated` header so
//! dependent fragments (the nav badge, the cart page) re-fetch themselves -
//! that header is the cart's change-notification channel.
//!
//! The page and fragments are availability-reconciled against the live
//! menu catalog. When the catalog cannot be fetched the cart fails open
//! (everything shown as available) and the page surfaces a retry banner.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use adas_kitchen_core::MenuItemId;

use crate::cart::{CartLineItem, CartStore, LineItemDraft, ReconciledCart, SessionSlot, availability};
use crate::filters;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLineItem> for CartLineView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: line.price.to_string(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub available: Vec<CartLineView>,
    pub unavailable: Vec<CartLineView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
    pub total_quantity: u32,
    /// The catalog fetch failed; availability is assumed, retry offered.
    pub catalog_stale: bool,
}

impl CartView {
    /// Whether the cart has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.unavailable.is_empty()
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Helpers
// =============================================================================

/// Load the session-backed cart store.
pub(crate) async fn load_store(state: &AppState, session: &Session) -> CartStore<SessionSlot> {
    CartStore::load(
        SessionSlot::cart(session.clone()),
        state.config().cart.default_stock_ceiling,
    )
    .await
}

/// Reconcile cart lines against the live catalog, failing open when the
/// catalog cannot be fetched. Returns the partition and whether it is stale.
pub(crate) async fn reconcile_against_catalog(
    state: &AppState,
    lines: &[CartLineItem],
) -> (ReconciledCart, bool) {
    match state.docstore().list_menu_items().await {
        Ok(catalog) => (availability::reconcile(lines, &catalog), false),
        Err(e) => {
            tracing::warn!(error = %e, "catalog fetch failed, treating cart as available");
            (ReconciledCart::assume_available(lines), true)
        }
    }
}

/// Build the template view from a reconciled cart.
fn cart_view(state: &AppState, reconciled: &ReconciledCart, catalog_stale: bool) -> CartView {
    let policy = &state.config().cart;
    let total_quantity = reconciled
        .available
        .iter()
        .chain(&reconciled.unavailable)
        .map(|line| line.quantity)
        .sum();

    CartView {
        available: reconciled.available.iter().map(CartLineView::from).collect(),
        unavailable: reconciled.unavailable.iter().map(CartLineView::from).collect(),
        subtotal: reconciled.subtotal().to_string(),
        delivery_fee: reconciled.delivery_fee(policy).to_string(),
        total: reconciled.total().to_string(),
        total_quantity,
        catalog_stale,
    }
}

/// Render the cart-items fragment for the current session state.
async fn items_fragment(state: &AppState, store: &CartStore<SessionSlot>) -> CartItemsTemplate {
    let (reconciled, stale) = reconcile_against_catalog(state, store.items()).await;
    CartItemsTemplate {
        cart: cart_view(state, &reconciled, stale),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for the cart page.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    /// Error code set by a failed checkout hand-off.
    pub error: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShowQuery>,
) -> CartShowTemplate {
    let store = load_store(&state, &session).await;
    let (reconciled, stale) = reconcile_against_catalog(&state, store.items()).await;

    let error = query.error.as_deref().map(|code| {
        match code {
            "pending" => "We couldn't hold your cart for sign-in. Please try again.",
            "auth" => "Sign-in didn't complete. Please try again.",
            _ => "Something went wrong. Please try again.",
        }
        .to_owned()
    });

    CartShowTemplate {
        cart: cart_view(&state, &reconciled, stale),
        error,
    }
}

/// Add a dish to the cart (HTMX).
///
/// Returns the count badge with an `HX-Trigger` so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let id = MenuItemId::new(form.item_id);
    let item = match state.docstore().get_menu_item(&id).await {
        Ok(item) => item,
        Err(e) => {
            tracing::error!(error = %e, %id, "failed to look up dish for add-to-cart");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"form-error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    if !item.available {
        return (
            StatusCode::CONFLICT,
            Html("<span class=\"form-error\">This dish is currently unavailable</span>"),
        )
            .into_response();
    }

    let mut store = load_store(&state, &session).await;
    store
        .add(LineItemDraft::from(&item), form.quantity.unwrap_or(1))
        .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: store.total_quantity(),
        },
    )
        .into_response()
}

/// Update a line's quantity (HTMX).
///
/// Quantity changes on unavailable lines are rejected - those lines can
/// only be removed. A quantity of zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let id = MenuItemId::new(form.item_id);
    let mut store = load_store(&state, &session).await;

    let (reconciled, stale) = reconcile_against_catalog(&state, store.items()).await;
    if reconciled.is_unavailable(&id) {
        tracing::warn!(%id, "rejected quantity change on unavailable line");
        return (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: cart_view(&state, &reconciled, stale),
            },
        )
            .into_response();
    }

    store.set_quantity(&id, form.quantity).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &store).await,
    )
        .into_response()
}

/// Remove a line from the cart (HTMX). Allowed for unavailable lines too.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let id = MenuItemId::new(form.item_id);
    let mut store = load_store(&state, &session).await;
    store.remove(&id).await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &store).await,
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let mut store = load_store(&state, &session).await;
    store.clear().await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &store).await,
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> CartCountTemplate {
    let store = load_store(&state, &session).await;
    CartCountTemplate {
        count: store.total_quantity(),
    }
}
