//! Account route handlers (requires auth).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use adas_kitchen_backend::docstore::Order;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub reference: String,
    pub placed_at: String,
    pub status: String,
    pub total: String,
    pub line_count: usize,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            reference: order.reference.clone(),
            placed_at: order.placed_at.format("%b %-d, %Y %H:%M").to_string(),
            status: order.status.label().to_owned(),
            total: order.total.to_string(),
            line_count: order.lines.len(),
        }
    }
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub email: String,
    pub orders: Vec<OrderView>,
}

/// Display the signed-in customer's order history, newest first.
///
/// The document store has no per-user query, so this filters the orders
/// collection client-side by the customer's email.
#[instrument(skip(state, user))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<OrdersTemplate> {
    let mut orders: Vec<Order> = state
        .docstore()
        .list_orders()
        .await?
        .into_iter()
        .filter(|order| order.customer_email == user.email.as_str())
        .collect();
    orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    Ok(OrdersTemplate {
        email: user.email.to_string(),
        orders: orders.iter().map(OrderView::from).collect(),
    })
}
