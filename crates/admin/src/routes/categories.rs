//! Category-management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use adas_kitchen_backend::docstore::{Category, CategoryInput};
use adas_kitchen_core::CategoryId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Category row for the listing.
#[derive(Clone)]
pub struct CategoryRowView {
    pub id: String,
    pub name: String,
}

impl From<&Category> for CategoryRowView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
        }
    }
}

/// Category listing template (with inline create form).
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryRowView>,
    pub can_delete: bool,
}

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// List categories.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<CategoriesIndexTemplate> {
    let categories = state.docstore().list_categories().await?;

    Ok(CategoriesIndexTemplate {
        categories: categories.iter().map(CategoryRowView::from).collect(),
        can_delete: staff.is_admin(),
    })
}

/// Create a category.
#[instrument(skip(state, _staff, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let name = form.name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    state.docstore().create_category(&CategoryInput { name }).await?;
    Ok(Redirect::to("/categories"))
}

/// Delete a category. Requires the admin role.
///
/// Menu items keep their denormalized category name; removing a category
/// only removes the filter, it never touches dishes.
#[instrument(skip(state, staff))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Redirect> {
    if !staff.is_admin() {
        return Err(AppError::Forbidden(
            "deleting categories requires the admin role".to_owned(),
        ));
    }

    state.docstore().delete_category(&CategoryId::new(id)).await?;
    Ok(Redirect::to("/categories"))
}
