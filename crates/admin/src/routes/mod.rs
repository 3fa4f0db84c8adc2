//! HTTP route handlers for the staff dashboards.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Dashboard (counts + recent orders)
//! GET  /health                   - Health check
//!
//! # Auth (hosted identity provider, staff roles only)
//! GET  /auth/login               - Redirect to the provider's sign-in page
//! GET  /auth/callback            - OAuth callback with the staff-role gate
//! POST /auth/logout              - Sign out
//!
//! # Menus
//! GET  /menus                    - List
//! GET  /menus/new                - Create form
//! POST /menus                    - Create
//! GET  /menus/{id}/edit          - Edit form
//! POST /menus/{id}               - Update
//! POST /menus/{id}/availability  - Toggle the availability flag
//! POST /menus/{id}/delete        - Delete (admin role)
//!
//! # Categories
//! GET  /categories               - List + inline create form
//! POST /categories               - Create
//! POST /categories/{id}/delete   - Delete (admin role)
//!
//! # Gallery
//! GET  /gallery                  - List + inline create form
//! POST /gallery                  - Add image
//! POST /gallery/{id}/delete      - Delete (admin role)
//!
//! # Catering packages
//! GET  /catering                 - List
//! GET  /catering/new             - Create form
//! POST /catering                 - Create
//! GET  /catering/{id}/edit       - Edit form
//! POST /catering/{id}            - Update
//! POST /catering/{id}/delete     - Delete (admin role)
//!
//! # Orders
//! GET  /orders                   - List (?status= filter)
//! GET  /orders/{id}              - Detail
//! POST /orders/{id}/status       - Status transition
//!
//! # Invoices
//! GET  /invoices                 - List
//! POST /invoices                 - Create from an order
//! GET  /invoices/{id}            - Detail
//! POST /invoices/{id}/status     - Status transition
//! ```

pub mod auth;
pub mod catering;
pub mod categories;
pub mod dashboard;
pub mod gallery;
pub mod invoices;
pub mod menus;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the menu-management routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menus::index).post(menus::create))
        .route("/new", get(menus::new))
        .route("/{id}", post(menus::update))
        .route("/{id}/edit", get(menus::edit))
        .route("/{id}/availability", post(menus::set_availability))
        .route("/{id}/delete", post(menus::delete))
}

/// Create the category-management routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the gallery-management routes router.
pub fn gallery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::index).post(gallery::create))
        .route("/{id}/delete", post(gallery::delete))
}

/// Create the catering-package routes router.
pub fn catering_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catering::index).post(catering::create))
        .route("/new", get(catering::new))
        .route("/{id}", post(catering::update))
        .route("/{id}/edit", get(catering::edit))
        .route("/{id}/delete", post(catering::delete))
}

/// Create the order-management routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::set_status))
}

/// Create the invoice-management routes router.
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(invoices::index).post(invoices::create))
        .route("/{id}", get(invoices::show))
        .route("/{id}/status", post(invoices::set_status))
}

/// Create all routes for the admin dashboards.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/auth", auth_routes())
        .nest("/menus", menu_routes())
        .nest("/categories", category_routes())
        .nest("/gallery", gallery_routes())
        .nest("/catering", catering_routes())
        .nest("/orders", order_routes())
        .nest("/invoices", invoice_routes())
}
