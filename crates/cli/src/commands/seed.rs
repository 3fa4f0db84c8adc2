//! Catalog seeding command.
//!
//! Writes a starter catalog (categories + menu items) into the document
//! store so a fresh environment has something to render. Seeding is
//! idempotent by name: existing categories and dishes are left alone.

use rust_decimal::Decimal;
use secrecy::SecretString;

use adas_kitchen_backend::docstore::{CategoryInput, MenuItemInput};
use adas_kitchen_backend::{DocstoreClient, DocstoreConfig};
use adas_kitchen_core::Price;

use super::{CliError, required_env};

const CATEGORIES: &[&str] = &["Mains", "Sides", "Grills", "Drinks"];

/// name, description, price, category, stock
const DISHES: &[(&str, &str, &str, &str, Option<u32>)] = &[
    (
        "Jollof Rice",
        "Smoky party-style jollof with fried plantain",
        "12.50",
        "Mains",
        None,
    ),
    (
        "Egusi Soup",
        "Ground melon-seed soup with pounded yam",
        "14.00",
        "Mains",
        None,
    ),
    (
        "Moi Moi",
        "Steamed bean pudding with peppers",
        "4.50",
        "Sides",
        None,
    ),
    ("Dodo", "Sweet fried plantain", "3.50", "Sides", None),
    (
        "Suya Skewers",
        "Peanut-spiced beef skewers, grilled to order",
        "8.00",
        "Grills",
        Some(20),
    ),
    (
        "Grilled Tilapia",
        "Whole tilapia with ata dindin",
        "16.00",
        "Grills",
        Some(10),
    ),
    ("Chapman", "House citrus punch", "4.00", "Drinks", None),
    ("Zobo", "Chilled hibiscus tea", "3.00", "Drinks", None),
];

/// Seed the starter catalog.
///
/// # Errors
///
/// Returns `CliError` if the store is unreachable or rejects a write.
pub async fn run() -> Result<(), CliError> {
    let config = DocstoreConfig {
        base_url: required_env("DOCSTORE_BASE_URL")?,
        api_key: SecretString::from(required_env("DOCSTORE_API_KEY")?),
    };
    let docstore = DocstoreClient::new(&config);

    seed_categories(&docstore).await?;
    seed_dishes(&docstore).await?;

    Ok(())
}

async fn seed_categories(docstore: &DocstoreClient) -> Result<(), CliError> {
    let existing = docstore.list_categories().await?;

    for name in CATEGORIES {
        if existing.iter().any(|c| c.name == *name) {
            tracing::info!(name, "category exists, skipping");
            continue;
        }
        docstore
            .create_category(&CategoryInput {
                name: (*name).to_owned(),
            })
            .await?;
        tracing::info!(name, "category created");
    }

    Ok(())
}

async fn seed_dishes(docstore: &DocstoreClient) -> Result<(), CliError> {
    let existing = docstore.list_menu_items().await?;

    for (name, description, price, category, stock) in DISHES {
        if existing.iter().any(|item| item.name == *name) {
            tracing::info!(name, "dish exists, skipping");
            continue;
        }

        let price = price
            .parse::<Decimal>()
            .map(Price::new)
            .expect("seed prices are valid decimals");

        docstore
            .create_menu_item(&MenuItemInput {
                name: (*name).to_owned(),
                description: Some((*description).to_owned()),
                price,
                image: None,
                category: Some((*category).to_owned()),
                available: true,
                stock: *stock,
            })
            .await?;
        tracing::info!(name, "dish created");
    }

    Ok(())
}
