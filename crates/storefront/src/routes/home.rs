//! Home page route handler.
//!
//! Shows the curated featured dishes plus a "popular this week" strip
//! ranked from recent order lines. Both sections degrade to empty rather
//! than failing the page - the home page must render even when the
//! document store is unreachable.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::{instrument, warn};

use adas_kitchen_backend::docstore::{FeaturedDish, MenuItem, Order};

use crate::filters;
use crate::routes::menu::MenuItemView;
use crate::state::AppState;

/// How many dishes the popular strip shows.
const POPULAR_LIMIT: usize = 4;

/// Featured dish display data for templates.
#[derive(Clone)]
pub struct FeaturedView {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<&FeaturedDish> for FeaturedView {
    fn from(dish: &FeaturedDish) -> Self {
        Self {
            name: dish.name.clone(),
            description: dish.description.clone(),
            image: dish.image.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<FeaturedView>,
    pub popular: Vec<MenuItemView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    let featured = match state.docstore().list_featured_dishes().await {
        Ok(dishes) => dishes.iter().map(FeaturedView::from).collect(),
        Err(e) => {
            warn!(error = %e, "failed to load featured dishes");
            Vec::new()
        }
    };

    let popular = match popular_dishes(&state).await {
        Ok(dishes) => dishes,
        Err(e) => {
            warn!(error = %e, "failed to rank popular dishes");
            Vec::new()
        }
    };

    HomeTemplate { featured, popular }
}

/// Fetch orders and menus, then rank the most-ordered available dishes.
async fn popular_dishes(
    state: &AppState,
) -> Result<Vec<MenuItemView>, adas_kitchen_backend::DocstoreError> {
    let orders = state.docstore().list_orders().await?;
    let menus = state.docstore().list_menu_items().await?;

    Ok(rank_popular(&orders, &menus, POPULAR_LIMIT)
        .iter()
        .map(|item| MenuItemView::from(*item))
        .collect())
}

/// Rank menu items by total ordered quantity, most-ordered first.
///
/// Only currently-available dishes are returned; ties keep menu order.
fn rank_popular<'a>(orders: &[Order], menus: &'a [MenuItem], limit: usize) -> Vec<&'a MenuItem> {
    let mut ordered_quantity: HashMap<&str, u64> = HashMap::new();
    for order in orders {
        for line in &order.lines {
            *ordered_quantity
                .entry(line.menu_item_id.as_str())
                .or_insert(0) += u64::from(line.quantity);
        }
    }

    let mut ranked: Vec<(&MenuItem, u64)> = menus
        .iter()
        .filter(|item| item.available)
        .filter_map(|item| {
            ordered_quantity
                .get(item.id.as_str())
                .map(|count| (item, *count))
        })
        .collect();

    // Stable sort keeps menu order for equally-popular dishes
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(item, _)| item).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use adas_kitchen_backend::docstore::OrderLine;
    use adas_kitchen_core::{MenuItemId, OrderId, OrderStatus, Price};

    use super::*;

    fn menu_item(id: &str, available: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: id.to_owned(),
            description: None,
            price: Price::from_minor(1000),
            image: None,
            category: None,
            available,
            stock: None,
        }
    }

    fn order_with(lines: &[(&str, u32)]) -> Order {
        Order {
            id: OrderId::new("o"),
            customer_email: "guest@example.com".to_owned(),
            reference: "AK-test".to_owned(),
            lines: lines
                .iter()
                .map(|(id, quantity)| OrderLine {
                    menu_item_id: MenuItemId::new(*id),
                    name: (*id).to_owned(),
                    unit_price: Price::from_minor(1000),
                    quantity: *quantity,
                })
                .collect(),
            subtotal: Price::ZERO,
            delivery_fee: Price::ZERO,
            total: Price::ZERO,
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        }
    }

    #[test]
    fn test_rank_by_total_quantity() {
        let menus = [menu_item("a", true), menu_item("b", true), menu_item("c", true)];
        let orders = [order_with(&[("a", 1), ("b", 5)]), order_with(&[("b", 2), ("c", 4)])];

        let ranked = rank_popular(&orders, &menus, 4);
        let ids: Vec<&str> = ranked.iter().map(|item| item.id.as_str()).collect();

        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_unavailable_dishes_excluded() {
        let menus = [menu_item("a", true), menu_item("b", false)];
        let orders = [order_with(&[("a", 1), ("b", 10)])];

        let ranked = rank_popular(&orders, &menus, 4);
        let ids: Vec<&str> = ranked.iter().map(|item| item.id.as_str()).collect();

        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn test_limit_applies() {
        let menus = [menu_item("a", true), menu_item("b", true), menu_item("c", true)];
        let orders = [order_with(&[("a", 3), ("b", 2), ("c", 1)])];

        assert_eq!(rank_popular(&orders, &menus, 2).len(), 2);
    }

    #[test]
    fn test_never_ordered_dishes_absent() {
        let menus = [menu_item("a", true), menu_item("quiet", true)];
        let orders = [order_with(&[("a", 1)])];

        let ranked = rank_popular(&orders, &menus, 4);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.first().unwrap().id.as_str(), "a");
    }
}
