//! Order-management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use adas_kitchen_backend::docstore::Order;
use adas_kitchen_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Order row for the listing.
#[derive(Clone)]
pub struct OrderRowView {
    pub id: String,
    pub reference: String,
    pub customer_email: String,
    pub placed_at: String,
    pub total: String,
    pub status: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            reference: order.reference.clone(),
            customer_email: order.customer_email.clone(),
            placed_at: order.placed_at.format("%b %-d, %Y %H:%M").to_string(),
            total: order.total.to_string(),
            status: order.status.label().to_owned(),
        }
    }
}

/// Order line row for the detail page.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Status option for the transition select.
#[derive(Clone)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Order listing template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderRowView>,
    pub statuses: Vec<StatusOption>,
    pub active_status: Option<String>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderRowView,
    pub lines: Vec<OrderLineView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub statuses: Vec<StatusOption>,
    pub is_terminal: bool,
}

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

/// Status transition form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

fn status_options(selected: Option<OrderStatus>) -> Vec<StatusOption> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str().to_owned(),
            label: status.label().to_owned(),
            selected: selected == Some(status),
        })
        .collect()
}

/// List orders, newest first, optionally filtered by status.
#[instrument(skip(state, _staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate> {
    let filter = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<OrderStatus>().map_err(|e| {
            AppError::BadRequest(e.to_string())
        })?),
        None => None,
    };

    let mut orders = state.docstore().list_orders().await?;
    orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    let orders = orders
        .iter()
        .filter(|order| filter.is_none_or(|status| order.status == status))
        .map(OrderRowView::from)
        .collect();

    Ok(OrdersIndexTemplate {
        orders,
        statuses: status_options(filter),
        active_status: filter.map(|status| status.as_str().to_owned()),
    })
}

/// Show one order with its lines.
#[instrument(skip(state, _staff))]
pub async fn show(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let order = state.docstore().get_order(&OrderId::new(id)).await?;

    let lines = order
        .lines
        .iter()
        .map(|line| OrderLineView {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_total: line.total().to_string(),
        })
        .collect();

    Ok(OrderShowTemplate {
        lines,
        subtotal: order.subtotal.to_string(),
        delivery_fee: order.delivery_fee.to_string(),
        statuses: status_options(Some(order.status)),
        is_terminal: order.status.is_terminal(),
        order: OrderRowView::from(&order),
    })
}

/// Transition an order's status.
#[instrument(skip(state, _staff, form))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status = form
        .status
        .parse::<OrderStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = OrderId::new(id);
    state.docstore().set_order_status(&id, status).await?;
    tracing::info!(order_id = %id, status = status.as_str(), "order status updated");

    Ok(Redirect::to(&format!("/orders/{id}")))
}
