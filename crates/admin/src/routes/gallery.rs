//! Gallery-management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use adas_kitchen_backend::docstore::{GalleryImage, GalleryImageInput};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Gallery row for the listing.
#[derive(Clone)]
pub struct GalleryRowView {
    pub id: String,
    pub title: Option<String>,
    pub image: String,
}

impl From<&GalleryImage> for GalleryRowView {
    fn from(image: &GalleryImage) -> Self {
        Self {
            id: image.id.clone(),
            title: image.title.clone(),
            image: image.image.clone(),
        }
    }
}

/// Gallery listing template (with inline create form).
#[derive(Template, WebTemplate)]
#[template(path = "gallery/index.html")]
pub struct GalleryIndexTemplate {
    pub images: Vec<GalleryRowView>,
    pub can_delete: bool,
}

/// Gallery form data.
#[derive(Debug, Deserialize)]
pub struct GalleryForm {
    pub image: String,
    pub title: Option<String>,
}

/// List gallery images.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<GalleryIndexTemplate> {
    let images = state.docstore().list_gallery_images().await?;

    Ok(GalleryIndexTemplate {
        images: images.iter().map(GalleryRowView::from).collect(),
        can_delete: staff.is_admin(),
    })
}

/// Add a gallery image.
#[instrument(skip(state, _staff, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Form(form): Form<GalleryForm>,
) -> Result<Redirect> {
    let image = form.image.trim().to_owned();
    if image.is_empty() {
        return Err(AppError::BadRequest("image URL is required".to_owned()));
    }

    let title = form
        .title
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());

    state
        .docstore()
        .create_gallery_image(&GalleryImageInput { title, image })
        .await?;
    Ok(Redirect::to("/gallery"))
}

/// Remove a gallery image. Requires the admin role.
#[instrument(skip(state, staff))]
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Redirect> {
    if !staff.is_admin() {
        return Err(AppError::Forbidden(
            "deleting gallery images requires the admin role".to_owned(),
        ));
    }

    state.docstore().delete_gallery_image(&id).await?;
    Ok(Redirect::to("/gallery"))
}
