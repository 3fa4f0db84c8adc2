//! Conversion from raw documents into domain types.
//!
//! Listings tolerate documents written by several generations of tooling:
//! `image` vs `imageUrl`, prices stored as JSON numbers or strings, and a
//! missing `available` flag meaning available. Documents missing essentials
//! (a name, a price) are skipped with a warning instead of failing the
//! whole listing.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use adas_kitchen_core::{CategoryId, MenuItemId, PackageId, Price};

use super::types::{
    CateringPackage, Category, Document, FeaturedDish, GalleryImage, Invoice, InvoiceRecord,
    MenuItem, Order, OrderRecord,
};

/// First non-empty string among the given field names.
fn string_field(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// A price stored either as a JSON number or a decimal string.
fn price_field(data: &Value, key: &str) -> Option<Price> {
    match data.get(key)? {
        Value::Number(n) => n.to_string().parse::<Decimal>().ok().map(Price::new),
        Value::String(s) => s.trim().parse::<Decimal>().ok().map(Price::new),
        _ => None,
    }
}

fn u32_field(data: &Value, key: &str) -> Option<u32> {
    data.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn bool_field(data: &Value, key: &str, default: bool) -> bool {
    data.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(super) fn menu_item(doc: &Document) -> Option<MenuItem> {
    let Some(name) = string_field(&doc.data, &["name"]) else {
        warn!(id = %doc.id, "skipping menu document without a name");
        return None;
    };
    let Some(price) = price_field(&doc.data, "price") else {
        warn!(id = %doc.id, "skipping menu document without a usable price");
        return None;
    };

    Some(MenuItem {
        id: MenuItemId::new(doc.id.clone()),
        name,
        description: string_field(&doc.data, &["description"]),
        price,
        image: string_field(&doc.data, &["image", "imageUrl"]),
        category: string_field(&doc.data, &["category"]),
        available: bool_field(&doc.data, "available", true),
        stock: u32_field(&doc.data, "stock"),
    })
}

pub(super) fn category(doc: &Document) -> Option<Category> {
    let Some(name) = string_field(&doc.data, &["name"]) else {
        warn!(id = %doc.id, "skipping category document without a name");
        return None;
    };

    Some(Category {
        id: CategoryId::new(doc.id.clone()),
        name,
    })
}

pub(super) fn featured_dish(doc: &Document) -> Option<FeaturedDish> {
    let Some(name) = string_field(&doc.data, &["name"]) else {
        warn!(id = %doc.id, "skipping featured-dish document without a name");
        return None;
    };

    Some(FeaturedDish {
        id: doc.id.clone(),
        name,
        description: string_field(&doc.data, &["description"]),
        image: string_field(&doc.data, &["image", "imageUrl"]),
        menu_item_id: string_field(&doc.data, &["menuItemId", "menu_item_id"])
            .map(MenuItemId::new),
    })
}

pub(super) fn gallery_image(doc: &Document) -> Option<GalleryImage> {
    let Some(image) = string_field(&doc.data, &["image", "imageUrl"]) else {
        warn!(id = %doc.id, "skipping gallery document without an image");
        return None;
    };

    Some(GalleryImage {
        id: doc.id.clone(),
        title: string_field(&doc.data, &["title", "caption"]),
        image,
    })
}

pub(super) fn catering_package(doc: &Document) -> Option<CateringPackage> {
    let Some(name) = string_field(&doc.data, &["name"]) else {
        warn!(id = %doc.id, "skipping catering document without a name");
        return None;
    };
    let Some(price) = price_field(&doc.data, "price") else {
        warn!(id = %doc.id, "skipping catering document without a usable price");
        return None;
    };

    let items = doc
        .data
        .get("items")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Some(CateringPackage {
        id: PackageId::new(doc.id.clone()),
        name,
        description: string_field(&doc.data, &["description"]),
        price,
        serves: u32_field(&doc.data, "serves"),
        items,
    })
}

pub(super) fn order(doc: &Document) -> Option<Order> {
    match serde_json::from_value::<OrderRecord>(doc.data.clone()) {
        Ok(record) => Some(Order::from_record(doc.id.clone().into(), record)),
        Err(e) => {
            warn!(id = %doc.id, error = %e, "skipping malformed order document");
            None
        }
    }
}

pub(super) fn invoice(doc: &Document) -> Option<Invoice> {
    match serde_json::from_value::<InvoiceRecord>(doc.data.clone()) {
        Ok(record) => Some(Invoice::from_record(doc.id.clone().into(), record)),
        Err(e) => {
            warn!(id = %doc.id, error = %e, "skipping malformed invoice document");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(id: &str, data: Value) -> Document {
        Document {
            id: id.to_owned(),
            data,
        }
    }

    #[test]
    fn test_menu_item_canonical_fields() {
        let item = menu_item(&doc(
            "jollof",
            json!({
                "name": "Jollof Rice",
                "description": "Smoky party-style jollof",
                "price": 12.5,
                "image": "/img/jollof.jpg",
                "category": "Mains",
                "available": true,
                "stock": 5,
            }),
        ))
        .unwrap();

        assert_eq!(item.id.as_str(), "jollof");
        assert_eq!(item.name, "Jollof Rice");
        assert_eq!(item.price, Price::from_minor(1250));
        assert_eq!(item.image.as_deref(), Some("/img/jollof.jpg"));
        assert_eq!(item.stock, Some(5));
        assert!(item.available);
    }

    #[test]
    fn test_menu_item_image_url_alias() {
        let item = menu_item(&doc(
            "suya",
            json!({ "name": "Suya", "price": "8.00", "imageUrl": "/img/suya.jpg" }),
        ))
        .unwrap();

        assert_eq!(item.image.as_deref(), Some("/img/suya.jpg"));
    }

    #[test]
    fn test_menu_item_canonical_image_wins_over_alias() {
        let item = menu_item(&doc(
            "moi-moi",
            json!({ "name": "Moi Moi", "price": 4, "image": "/a.jpg", "imageUrl": "/b.jpg" }),
        ))
        .unwrap();

        assert_eq!(item.image.as_deref(), Some("/a.jpg"));
    }

    #[test]
    fn test_menu_item_available_defaults_true() {
        let item = menu_item(&doc("a", json!({ "name": "A", "price": 1 }))).unwrap();
        assert!(item.available);

        let item = menu_item(&doc("b", json!({ "name": "B", "price": 1, "available": false })))
            .unwrap();
        assert!(!item.available);
    }

    #[test]
    fn test_menu_item_price_as_string() {
        let item = menu_item(&doc("a", json!({ "name": "A", "price": "15.75" }))).unwrap();
        assert_eq!(item.price, Price::from_minor(1575));
    }

    #[test]
    fn test_menu_item_missing_essentials_skipped() {
        assert!(menu_item(&doc("a", json!({ "price": 3 }))).is_none());
        assert!(menu_item(&doc("b", json!({ "name": "B" }))).is_none());
        assert!(menu_item(&doc("c", json!({ "name": "C", "price": "not-a-price" }))).is_none());
    }

    #[test]
    fn test_gallery_image_caption_alias() {
        let image = gallery_image(&doc(
            "g1",
            json!({ "imageUrl": "/g/1.jpg", "caption": "Kitchen at dusk" }),
        ))
        .unwrap();

        assert_eq!(image.image, "/g/1.jpg");
        assert_eq!(image.title.as_deref(), Some("Kitchen at dusk"));
    }

    #[test]
    fn test_catering_package_items_default_empty() {
        let package =
            catering_package(&doc("p1", json!({ "name": "Party Tray", "price": 120 }))).unwrap();
        assert!(package.items.is_empty());
        assert_eq!(package.price, Price::from_major(120));
    }

    #[test]
    fn test_order_roundtrip() {
        let record = json!({
            "customer_email": "guest@example.com",
            "reference": "AK-3f9c2a1b",
            "lines": [
                { "menu_item_id": "jollof", "name": "Jollof Rice", "unit_price": "12.00", "quantity": 2 }
            ],
            "subtotal": "24.00",
            "delivery_fee": "5.00",
            "total": "24.00",
            "status": "pending",
            "placed_at": "2026-03-01T18:30:00Z",
        });

        let order = order(&doc("ord-1", record)).unwrap();
        assert_eq!(order.id.as_str(), "ord-1");
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.subtotal, Price::from_major(24));
        assert_eq!(order.lines.first().unwrap().total(), Price::from_major(24));
    }

    #[test]
    fn test_order_malformed_skipped() {
        assert!(order(&doc("bad", json!({ "customer_email": 42 }))).is_none());
    }
}
