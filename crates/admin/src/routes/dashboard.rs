//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use adas_kitchen_backend::docstore::Order;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// How many recent orders the dashboard shows.
const RECENT_ORDERS: usize = 10;

/// Recent-order row for the dashboard.
#[derive(Clone)]
pub struct RecentOrderView {
    pub id: String,
    pub reference: String,
    pub customer_email: String,
    pub placed_at: String,
    pub total: String,
    pub status: String,
}

impl From<&Order> for RecentOrderView {
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

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub staff_name: String,
    pub menu_count: usize,
    pub category_count: usize,
    pub package_count: usize,
    pub open_order_count: usize,
    pub recent_orders: Vec<RecentOrderView>,
}

/// Display the dashboard: collection counts plus the latest orders.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<DashboardTemplate> {
    let menus = state.docstore().list_menu_items().await?;
    let categories = state.docstore().list_categories().await?;
    let packages = state.docstore().list_catering_packages().await?;

    let mut orders = state.docstore().list_orders().await?;
    orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    let open_order_count = orders
        .iter()
        .filter(|order| !order.status.is_terminal())
        .count();

    let staff_name = staff
        .name
        .clone()
        .unwrap_or_else(|| staff.email.to_string());

    Ok(DashboardTemplate {
        staff_name,
        menu_count: menus.len(),
        category_count: categories.len(),
        package_count: packages.len(),
        open_order_count,
        recent_orders: orders
            .iter()
            .take(RECENT_ORDERS)
            .map(RecentOrderView::from)
            .collect(),
    })
}
