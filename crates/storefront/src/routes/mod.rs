//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured + popular dishes)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /menu                   - Menu grid (?category= filter)
//! GET  /gallery                - Photo gallery
//! GET  /catering               - Catering packages
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page (availability-reconciled)
//! POST /cart/add               - Add a dish (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove a line (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Place order, or save guest cart + redirect to sign-in
//! GET  /checkout/confirmation  - Order-placed page
//!
//! # Auth (hosted identity provider)
//! GET  /auth/login             - Redirect to the provider's sign-in page
//! GET  /auth/callback          - Handle the OAuth callback (merges any pending guest cart)
//! POST /auth/logout            - Sign out
//! GET  /auth/password-reset    - Redirect to the provider's hosted reset flow
//!
//! # Account (requires auth)
//! GET  /account/orders         - Order history
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catering;
pub mod checkout;
pub mod gallery;
pub mod home;
pub mod menu;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
        .route("/password-reset", get(auth::password_reset))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(menu::index))
        .route("/gallery", get(gallery::index))
        .route("/catering", get(catering::index))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::checkout))
        .route("/checkout/confirmation", get(checkout::confirmation))
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}
