//! Catering-package route handlers.

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

use adas_kitchen_backend::docstore::{CateringPackage, CateringPackageInput};
use adas_kitchen_core::{PackageId, Price};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Package row for the listing.
#[derive(Clone)]
pub struct PackageRowView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub serves: Option<u32>,
    pub item_count: usize,
}

impl From<&CateringPackage> for PackageRowView {
    fn from(package: &CateringPackage) -> Self {
        Self {
            id: package.id.to_string(),
            name: package.name.clone(),
            price: package.price.to_string(),
            serves: package.serves,
            item_count: package.items.len(),
        }
    }
}

/// Pre-filled form values for the edit form.
#[derive(Clone, Default)]
pub struct PackageFormView {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub serves: String,
    /// One dish per line in the textarea.
    pub items: String,
}

impl From<&CateringPackage> for PackageFormView {
    fn from(package: &CateringPackage) -> Self {
        Self {
            id: Some(package.id.to_string()),
            name: package.name.clone(),
            description: package.description.clone().unwrap_or_default(),
            price: package.price.amount().to_string(),
            serves: package.serves.map(|s| s.to_string()).unwrap_or_default(),
            items: package.items.join("\n"),
        }
    }
}

/// Package listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catering/index.html")]
pub struct CateringIndexTemplate {
    pub packages: Vec<PackageRowView>,
    pub can_delete: bool,
}

/// Package create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "catering/form.html")]
pub struct CateringFormTemplate {
    pub form: PackageFormView,
}

/// Catering package form data.
#[derive(Debug, Deserialize)]
pub struct PackageForm {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub serves: Option<String>,
    /// One dish per line.
    pub items: Option<String>,
}

impl PackageForm {
    fn into_input(self) -> Result<CateringPackageInput> {
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

        let serves = match self.serves.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                AppError::BadRequest("serves must be a whole number".to_owned())
            })?),
            None => None,
        };

        let items = self
            .items
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        Ok(CateringPackageInput {
            name,
            description: self
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            price,
            serves,
            items,
        })
    }
}

/// List catering packages.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<CateringIndexTemplate> {
    let packages = state.docstore().list_catering_packages().await?;

    Ok(CateringIndexTemplate {
        packages: packages.iter().map(PackageRowView::from).collect(),
        can_delete: staff.is_admin(),
    })
}

/// Show the create form.
#[instrument(skip(_staff))]
pub async fn new(RequireStaff(_staff): RequireStaff) -> CateringFormTemplate {
    CateringFormTemplate {
        form: PackageFormView::default(),
    }
}

/// Create a catering package.
#[instrument(skip(state, _staff, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Form(form): Form<PackageForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    state.docstore().create_catering_package(&input).await?;

    Ok(Redirect::to("/catering"))
}

/// Show the edit form.
#[instrument(skip(state, _staff))]
pub async fn edit(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<CateringFormTemplate> {
    let package = state
        .docstore()
        .get_catering_package(&PackageId::new(id))
        .await?;

    Ok(CateringFormTemplate {
        form: PackageFormView::from(&package),
    })
}

/// Update a catering package.
#[instrument(skip(state, _staff, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<PackageForm>,
) -> Result<Redirect> {
    let input = form.into_input()?;
    state
        .docstore()
        .update_catering_package(&PackageId::new(id), &input)
        .await?;

    Ok(Redirect::to("/catering"))
}

/// Delete a catering package. Requires the admin role.
#[instrument(skip(state, staff))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Redirect> {
    if !staff.is_admin() {
        return Err(AppError::Forbidden(
            "deleting catering packages requires the admin role".to_owned(),
        ));
    }

    state
        .docstore()
        .delete_catering_package(&PackageId::new(id))
        .await?;
    Ok(Redirect::to("/catering"))
}
