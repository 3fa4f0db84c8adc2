//! Menu page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use adas_kitchen_backend::docstore::{Category, MenuItem};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Menu item display data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub available: bool,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
            category: item.category.clone(),
            available: item.available,
        }
    }
}

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
        }
    }
}

/// Query parameters for the menu page.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Restrict the grid to one category.
    pub category: Option<String>,
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub categories: Vec<CategoryView>,
    pub items: Vec<MenuItemView>,
    pub active_category: Option<String>,
}

/// Display the menu, optionally filtered to one category.
///
/// Unavailable dishes stay visible but cannot be added to the cart.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<MenuTemplate> {
    let items = state.docstore().list_menu_items().await?;
    let categories = state.docstore().list_categories().await?;

    let active_category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned);

    let items = items
        .iter()
        .filter(|item| match &active_category {
            Some(active) => item.category.as_deref() == Some(active.as_str()),
            None => true,
        })
        .map(MenuItemView::from)
        .collect();

    Ok(MenuTemplate {
        categories: categories.iter().map(CategoryView::from).collect(),
        items,
        active_category,
    })
}
