//! Gallery page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use adas_kitchen_backend::docstore::GalleryImage;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Gallery image display data for templates.
#[derive(Clone)]
pub struct GalleryView {
    pub title: Option<String>,
    pub image: String,
}

impl From<&GalleryImage> for GalleryView {
    fn from(image: &GalleryImage) -> Self {
        Self {
            title: image.title.clone(),
            image: image.image.clone(),
        }
    }
}

/// Gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate {
    pub images: Vec<GalleryView>,
}

/// Display the photo gallery.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<GalleryTemplate> {
    let images = state.docstore().list_gallery_images().await?;

    Ok(GalleryTemplate {
        images: images.iter().map(GalleryView::from).collect(),
    })
}
