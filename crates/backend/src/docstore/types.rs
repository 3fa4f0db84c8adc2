//! Domain types backed by document-store collections.
//!
//! Documents written by this workspace use the canonical field names on the
//! input/record types below. Reads additionally tolerate the historical
//! aliases accumulated by earlier writers (see `conversions`), most notably
//! `imageUrl` for `image` and a missing `available` flag meaning available.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adas_kitchen_core::{
    CategoryId, InvoiceId, InvoiceStatus, MenuItemId, OrderId, OrderStatus, PackageId, Price,
};

/// A raw document: opaque id plus a JSON data payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier, unique within its collection.
    pub id: String,
    /// Field payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

// =============================================================================
// Menu catalog
// =============================================================================

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub category: Option<String>,
    /// Whether the kitchen is currently serving this dish.
    pub available: bool,
    /// Per-order ceiling, when the kitchen declares one.
    pub stock: Option<u32>,
}

/// Editable menu-item fields, written with canonical names.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// A menu category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Editable category fields.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

/// A home-page featured dish (display-only; may reference a menu item).
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedDish {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub menu_item_id: Option<MenuItemId>,
}

/// A gallery photo.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub id: String,
    pub title: Option<String>,
    pub image: String,
}

/// Editable gallery fields.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryImageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub image: String,
}

/// A catering package.
#[derive(Debug, Clone, PartialEq)]
pub struct CateringPackage {
    pub id: PackageId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    /// Head count the package is sized for.
    pub serves: Option<u32>,
    /// Dishes included in the package.
    pub items: Vec<String>,
}

/// Editable catering-package fields.
#[derive(Debug, Clone, Serialize)]
pub struct CateringPackageInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serves: Option<u32>,
    pub items: Vec<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of a placed order (denormalized snapshot at placement time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total (`unit_price x quantity`).
    #[must_use]
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The serialized payload of an order document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer_email: String,
    /// Short human-readable reference for the kitchen ("AK-3f9c2a1b").
    pub reference: String,
    pub lines: Vec<OrderLine>,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

/// A placed order, as read back from the store.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub customer_email: String,
    pub reference: String,
    pub lines: Vec<OrderLine>,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Attach a store-assigned id to an order payload.
    #[must_use]
    pub fn from_record(id: OrderId, record: OrderRecord) -> Self {
        Self {
            id,
            customer_email: record.customer_email,
            reference: record.reference,
            lines: record.lines,
            subtotal: record.subtotal,
            delivery_fee: record.delivery_fee,
            total: record.total,
            status: record.status,
            placed_at: record.placed_at,
        }
    }
}

// =============================================================================
// Invoices
// =============================================================================

/// The serialized payload of an invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Human-readable invoice number ("INV-3f9c2a1b").
    pub number: String,
    pub order_id: OrderId,
    pub customer_email: String,
    pub amount: Price,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
}

/// An invoice, as read back from the store.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub order_id: OrderId,
    pub customer_email: String,
    pub amount: Price,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Attach a store-assigned id to an invoice payload.
    #[must_use]
    pub fn from_record(id: InvoiceId, record: InvoiceRecord) -> Self {
        Self {
            id,
            number: record.number,
            order_id: record.order_id,
            customer_email: record.customer_email,
            amount: record.amount,
            status: record.status,
            issued_at: record.issued_at,
        }
    }
}
