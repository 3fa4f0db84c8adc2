//! Menu-management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use adas_kitchen_backend::docstore::{MenuItem, MenuItemInput};
use adas_kitchen_core::{MenuItemId, Price};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Menu item row for the listing.
#[derive(Clone)]
pub struct MenuRowView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: Option<String>,
    pub available: bool,
    pub stock: Option<u32>,
}

impl From<&MenuItem> for MenuRowView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.to_string(),
            category: item.category.clone(),
            available: item.available,
            stock: item.stock,
        }
    }
}

/// Pre-filled form values for the edit form.
#[derive(Clone, Default)]
pub struct MenuFormView {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub available: bool,
    pub stock: String,
}

impl From<&MenuItem> for MenuFormView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: Some(item.id.to_string()),
            name: item.name.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price.amount().to_string(),
            image: item.image.clone().unwrap_or_default(),
            category: item.category.clone().unwrap_or_default(),
            available: item.available,
            stock: item.stock.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

/// Menu listing template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/index.html")]
pub struct MenusIndexTemplate {
    pub items: Vec<MenuRowView>,
    pub can_delete: bool,
}

/// Menu create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "menus/form.html")]
pub struct MenuFormTemplate {
    pub form: MenuFormView,
}

/// Menu item form data.
#[derive(Debug, Deserialize)]
pub struct MenuItemForm {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: Option<String>,
    pub category: Option<String>,
    /// Checkbox: present when checked.
    pub available: Option<String>,
    pub stock: Option<String>,
}

/// Empty-string-aware optional field.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl MenuItemForm {
    /// Validate and convert the form into a document-store input.
    fn into_input(self) -> Result<MenuItemInput> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_owned()));
        }

        let price = self
            .price
            .trim()
            .parse::<Decimal>()
            .map(Price::new)
            .map_err(|_| AppError::BadRequest("price must be a decimal amount".to_owned()))?;

        let stock = match non_empty(self.stock) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                AppError::BadRequest("stock must be a whole number".to_owned())
            })?),
            None => None,
        };

        Ok(MenuItemInput {
            name,
            description: non_empty(self.description),
            price,
            image: non_empty(self.image),
            category: non_empty(self.category),
            available: self.available.is_some(),
            stock,
        })
    }
}

/// List all menu items.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<MenusIndexTemplate> {
    let items = state.docstore().list_menu_items().await?;

    Ok(MenusIndexTemplate {
        items: items.iter().map(MenuRowView::from).collect(),
        can_delete: staff.is_admin(),
    })
}

/// Show the create form.
#[instrument(skip(_staff))]
pub async fn new(RequireStaff(_staff): RequireStaff) -> MenuFormTemplate {
    MenuFormTemplate {
        form: MenuFormView {
            available: true,
            ..MenuFormView::default()
        },
    }
}

/// Create a menu item.
#[instrument(skip(state, _staff, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Form(form): Form<MenuItemForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    state.docstore().create_menu_item(&input).await?;
    tracing::info!(name = %input.name, "menu item created");

    Ok(Redirect::to("/menus"))
}

/// Show the edit form.
#[instrument(skip(state, _staff))]
pub async fn edit(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<MenuFormTemplate> {
    let item = state.docstore().get_menu_item(&MenuItemId::new(id)).await?;

    Ok(MenuFormTemplate {
        form: MenuFormView::from(&item),
    })
}

/// Update a menu item.
#[instrument(skip(state, _staff, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<MenuItemForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    state
        .docstore()
        .update_menu_item(&MenuItemId::new(id), &input)
        .await?;

    Ok(Redirect::to("/menus"))
}

/// Availability toggle form data.
#[derive(Debug, Deserialize)]
pub struct AvailabilityForm {
    pub available: bool,
}

/// Flip a menu item's availability (the 86 board).
#[instrument(skip(state, _staff))]
pub async fn set_availability(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<AvailabilityForm>,
) -> Result<Redirect> {
    state
        .docstore()
        .set_menu_item_availability(&MenuItemId::new(id), form.available)
        .await?;

    Ok(Redirect::to("/menus"))
}

/// Delete a menu item. Requires the admin role.
#[instrument(skip(state, staff))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Redirect> {
    if !staff.is_admin() {
        return Err(AppError::Forbidden(
            "deleting menu items requires the admin role".to_owned(),
        ));
    }

    state.docstore().delete_menu_item(&MenuItemId::new(id)).await?;
    Ok(Redirect::to("/menus"))
}
