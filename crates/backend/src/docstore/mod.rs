//! Document-store client.
//!
//! All catalog and order data lives in a hosted document database exposed as
//! named collections of JSON documents:
//!
//! - `GET    {base}/v1/{collection}` - list documents
//! - `GET    {base}/v1/{collection}/{id}` - fetch one document
//! - `POST   {base}/v1/{collection}` - create (store assigns the id)
//! - `PATCH  {base}/v1/{collection}/{id}` - merge fields into a document
//! - `DELETE {base}/v1/{collection}/{id}` - delete
//!
//! The store is the source of truth - there is NO local mirror or sync.
//! Catalog-ish collections (menus, categories, featured dishes, gallery,
//! catering packages) are cached in-process via `moka` with a 5-minute TTL;
//! orders and invoices are always fetched live.

mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use adas_kitchen_core::{CategoryId, InvoiceId, InvoiceStatus, MenuItemId, OrderId, OrderStatus, PackageId};

pub use types::{
    CateringPackage, CateringPackageInput, Category, CategoryInput, Document, FeaturedDish,
    GalleryImage, GalleryImageInput, Invoice, InvoiceRecord, MenuItem, MenuItemInput, Order,
    OrderLine, OrderRecord,
};

/// Collection names in the document store.
pub mod collections {
    pub const MENUS: &str = "menus";
    pub const CATEGORIES: &str = "categories";
    pub const FEATURED_DISHES: &str = "featuredDishes";
    pub const GALLERY: &str = "gallery";
    pub const CATERING_PACKAGES: &str = "cateringPackages";
    pub const ORDERS: &str = "orders";
    pub const INVOICES: &str = "invoices";
}

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum DocstoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the store.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A fetched document is missing required fields.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Any other non-success response.
    #[error("Document store returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },
}

/// Document-store configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct DocstoreConfig {
    /// Base URL of the document API (no trailing slash).
    pub base_url: String,
    /// Server-side API key.
    pub api_key: SecretString,
}

impl std::fmt::Debug for DocstoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocstoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Shape of a collection listing response.
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

// =============================================================================
// DocstoreClient
// =============================================================================

/// Client for the hosted document store.
///
/// Cheaply cloneable; catalog listings are cached for 5 minutes and
/// invalidated automatically by the mutation methods.
#[derive(Clone)]
pub struct DocstoreClient {
    inner: Arc<DocstoreClientInner>,
}

struct DocstoreClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Cache<String, Arc<Vec<Document>>>,
}

impl DocstoreClient {
    /// Create a new document-store client.
    #[must_use]
    pub fn new(config: &DocstoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(DocstoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                api_key: config.api_key.expose_secret().to_owned(),
                cache,
            }),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/v1/{collection}", self.inner.base_url)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/v1/{collection}/{id}", self.inner.base_url)
    }

    /// Map a non-success response into a `DocstoreError`.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DocstoreError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(DocstoreError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            let path = response.url().path().to_owned();
            return Err(DocstoreError::NotFound(path));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect::<String>();
            return Err(DocstoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    // =========================================================================
    // Raw document operations
    // =========================================================================

    /// List every document in a collection (no cache).
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport, auth, or parse failure.
    pub async fn list(&self, collection: &str) -> Result<Vec<Document>, DocstoreError> {
        debug!(collection, "listing documents");
        let response = self
            .inner
            .client
            .get(self.collection_url(collection))
            .bearer_auth(&self.inner.api_key)
            .send()
            .await?;

        let listing: DocumentList = Self::check(response).await?.json().await?;
        Ok(listing.documents)
    }

    /// List a collection through the 5-minute cache.
    ///
    /// Only appropriate for catalog collections; orders and invoices must
    /// use [`Self::list`] so staff always see live state.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing has to be fetched and fails.
    pub async fn list_cached(&self, collection: &str) -> Result<Arc<Vec<Document>>, DocstoreError> {
        if let Some(cached) = self.inner.cache.get(collection).await {
            return Ok(cached);
        }

        let documents = Arc::new(self.list(collection).await?);
        self.inner
            .cache
            .insert(collection.to_owned(), Arc::clone(&documents))
            .await;
        Ok(documents)
    }

    /// Fetch a single document.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the document does not exist.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Document, DocstoreError> {
        let response = self
            .inner
            .client
            .get(self.document_url(collection, id))
            .bearer_auth(&self.inner.api_key)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Create a document; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create(
        &self,
        collection: &str,
        data: &serde_json::Value,
    ) -> Result<Document, DocstoreError> {
        let response = self
            .inner
            .client
            .post(self.collection_url(collection))
            .bearer_auth(&self.inner.api_key)
            .json(data)
            .send()
            .await?;

        let document: Document = Self::check(response).await?.json().await?;
        self.invalidate(collection).await;
        Ok(document)
    }

    /// Merge fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the document does not exist.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        data: &serde_json::Value,
    ) -> Result<Document, DocstoreError> {
        let response = self
            .inner
            .client
            .patch(self.document_url(collection, id))
            .bearer_auth(&self.inner.api_key)
            .json(data)
            .send()
            .await?;

        let document: Document = Self::check(response).await?.json().await?;
        self.invalidate(collection).await;
        Ok(document)
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the document does not exist.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), DocstoreError> {
        let response = self
            .inner
            .client
            .delete(self.document_url(collection, id))
            .bearer_auth(&self.inner.api_key)
            .send()
            .await?;

        Self::check(response).await?;
        self.invalidate(collection).await;
        Ok(())
    }

    /// Drop a collection's cached listing.
    pub async fn invalidate(&self, collection: &str) {
        self.inner.cache.invalidate(collection).await;
    }

    // =========================================================================
    // Menu catalog
    // =========================================================================

    /// All menu items (cached). Malformed documents are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_menu_items(&self) -> Result<Vec<MenuItem>, DocstoreError> {
        let documents = self.list_cached(collections::MENUS).await?;
        Ok(documents.iter().filter_map(conversions::menu_item).collect())
    }

    /// A single menu item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `Malformed` if it cannot be interpreted.
    pub async fn get_menu_item(&self, id: &MenuItemId) -> Result<MenuItem, DocstoreError> {
        let document = self.get(collections::MENUS, id.as_str()).await?;
        conversions::menu_item(&document)
            .ok_or_else(|| DocstoreError::Malformed(format!("menus/{id}")))
    }

    /// Create a menu item.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create_menu_item(&self, input: &MenuItemInput) -> Result<Document, DocstoreError> {
        self.create(collections::MENUS, &serde_json::to_value(input)?)
            .await
    }

    /// Replace a menu item's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the item does not exist.
    pub async fn update_menu_item(
        &self,
        id: &MenuItemId,
        input: &MenuItemInput,
    ) -> Result<Document, DocstoreError> {
        self.update(collections::MENUS, id.as_str(), &serde_json::to_value(input)?)
            .await
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the item does not exist.
    pub async fn delete_menu_item(&self, id: &MenuItemId) -> Result<(), DocstoreError> {
        self.delete(collections::MENUS, id.as_str()).await
    }

    /// Flip a menu item's availability flag.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the item does not exist.
    pub async fn set_menu_item_availability(
        &self,
        id: &MenuItemId,
        available: bool,
    ) -> Result<(), DocstoreError> {
        self.update(collections::MENUS, id.as_str(), &json!({ "available": available }))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Other catalog collections
    // =========================================================================

    /// All categories (cached).
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DocstoreError> {
        let documents = self.list_cached(collections::CATEGORIES).await?;
        Ok(documents.iter().filter_map(conversions::category).collect())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Document, DocstoreError> {
        self.create(collections::CATEGORIES, &serde_json::to_value(input)?)
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the category does not exist.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), DocstoreError> {
        self.delete(collections::CATEGORIES, id.as_str()).await
    }

    /// Featured dishes for the home page (cached).
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_featured_dishes(&self) -> Result<Vec<FeaturedDish>, DocstoreError> {
        let documents = self.list_cached(collections::FEATURED_DISHES).await?;
        Ok(documents
            .iter()
            .filter_map(conversions::featured_dish)
            .collect())
    }

    /// Gallery images (cached).
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, DocstoreError> {
        let documents = self.list_cached(collections::GALLERY).await?;
        Ok(documents
            .iter()
            .filter_map(conversions::gallery_image)
            .collect())
    }

    /// Add a gallery image.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create_gallery_image(
        &self,
        input: &GalleryImageInput,
    ) -> Result<Document, DocstoreError> {
        self.create(collections::GALLERY, &serde_json::to_value(input)?)
            .await
    }

    /// Remove a gallery image.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the image does not exist.
    pub async fn delete_gallery_image(&self, id: &str) -> Result<(), DocstoreError> {
        self.delete(collections::GALLERY, id).await
    }

    /// Catering packages (cached).
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_catering_packages(&self) -> Result<Vec<CateringPackage>, DocstoreError> {
        let documents = self.list_cached(collections::CATERING_PACKAGES).await?;
        Ok(documents
            .iter()
            .filter_map(conversions::catering_package)
            .collect())
    }

    /// A single catering package.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `Malformed` if it cannot be interpreted.
    pub async fn get_catering_package(&self, id: &PackageId) -> Result<CateringPackage, DocstoreError> {
        let document = self.get(collections::CATERING_PACKAGES, id.as_str()).await?;
        conversions::catering_package(&document)
            .ok_or_else(|| DocstoreError::Malformed(format!("cateringPackages/{id}")))
    }

    /// Create a catering package.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create_catering_package(
        &self,
        input: &CateringPackageInput,
    ) -> Result<Document, DocstoreError> {
        self.create(collections::CATERING_PACKAGES, &serde_json::to_value(input)?)
            .await
    }

    /// Replace a catering package's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the package does not exist.
    pub async fn update_catering_package(
        &self,
        id: &PackageId,
        input: &CateringPackageInput,
    ) -> Result<Document, DocstoreError> {
        self.update(
            collections::CATERING_PACKAGES,
            id.as_str(),
            &serde_json::to_value(input)?,
        )
        .await
    }

    /// Delete a catering package.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the package does not exist.
    pub async fn delete_catering_package(&self, id: &PackageId) -> Result<(), DocstoreError> {
        self.delete(collections::CATERING_PACKAGES, id.as_str()).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// All orders, live (never cached). Malformed documents are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_orders(&self) -> Result<Vec<Order>, DocstoreError> {
        let documents = self.list(collections::ORDERS).await?;
        Ok(documents.iter().filter_map(conversions::order).collect())
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `Malformed` if it cannot be interpreted.
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, DocstoreError> {
        let document = self.get(collections::ORDERS, id.as_str()).await?;
        conversions::order(&document)
            .ok_or_else(|| DocstoreError::Malformed(format!("orders/{id}")))
    }

    /// Place a new order.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn place_order(&self, record: &OrderRecord) -> Result<Order, DocstoreError> {
        let document = self
            .create(collections::ORDERS, &serde_json::to_value(record)?)
            .await?;
        Ok(Order::from_record(
            OrderId::new(document.id),
            record.clone(),
        ))
    }

    /// Transition an order's status.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the order does not exist.
    pub async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), DocstoreError> {
        self.update(collections::ORDERS, id.as_str(), &json!({ "status": status }))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    /// All invoices, live (never cached). Malformed documents are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` if the listing fetch fails.
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, DocstoreError> {
        let documents = self.list(collections::INVOICES).await?;
        Ok(documents.iter().filter_map(conversions::invoice).collect())
    }

    /// A single invoice.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent, `Malformed` if it cannot be interpreted.
    pub async fn get_invoice(&self, id: &InvoiceId) -> Result<Invoice, DocstoreError> {
        let document = self.get(collections::INVOICES, id.as_str()).await?;
        conversions::invoice(&document)
            .ok_or_else(|| DocstoreError::Malformed(format!("invoices/{id}")))
    }

    /// Create an invoice.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError` on transport or API failure.
    pub async fn create_invoice(&self, record: &InvoiceRecord) -> Result<Invoice, DocstoreError> {
        let document = self
            .create(collections::INVOICES, &serde_json::to_value(record)?)
            .await?;
        Ok(Invoice::from_record(
            InvoiceId::new(document.id),
            record.clone(),
        ))
    }

    /// Transition an invoice's status.
    ///
    /// # Errors
    ///
    /// Returns `DocstoreError::NotFound` if the invoice does not exist.
    pub async fn set_invoice_status(
        &self,
        id: &InvoiceId,
        status: InvoiceStatus,
    ) -> Result<(), DocstoreError> {
        self.update(collections::INVOICES, id.as_str(), &json!({ "status": status }))
            .await?;
        Ok(())
    }
}
