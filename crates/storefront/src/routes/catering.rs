//! Catering packages page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use adas_kitchen_backend::docstore::CateringPackage;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Catering package display data for templates.
#[derive(Clone)]
pub struct PackageView {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub serves: Option<u32>,
    pub items: Vec<String>,
}

impl From<&CateringPackage> for PackageView {
    fn from(package: &CateringPackage) -> Self {
        Self {
            name: package.name.clone(),
            description: package.description.clone(),
            price: package.price.to_string(),
            serves: package.serves,
            items: package.items.clone(),
        }
    }
}

/// Catering page template.
#[derive(Template, WebTemplate)]
#[template(path = "catering.html")]
pub struct CateringTemplate {
    pub packages: Vec<PackageView>,
}

/// Display the catering packages.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<CateringTemplate> {
    let packages = state.docstore().list_catering_packages().await?;

    Ok(CateringTemplate {
        packages: packages.iter().map(PackageView::from).collect(),
    })
}
