use anyhow::Result;
use bespoke_bouquet::core::cart::{CART_KEY, CUSTOM_CART_KEY};
use bespoke_bouquet::domain::model::{
    AddOn, BouquetSize, CarouselImage, ImageAsset, ImageRef, Product,
};
use bespoke_bouquet::domain::money::Money;
use bespoke_bouquet::{CartStore, Customization, LocalStorage};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn product() -> Product {
    Product {
        id: "4".to_string(),
        name: "Autumn Whisper".to_string(),
        price: Money::from_pence(7500),
        description: "Burnt orange roses mixed with dried wheat and berries.".to_string(),
        image_url: "https://cdn.example.com/autumn.jpg".to_string(),
        tags: vec!["Seasonal".to_string(), "Warm".to_string()],
    }
}

fn gallery_image() -> CarouselImage {
    CarouselImage {
        id: "img-7".to_string(),
        title: "Garden Party".to_string(),
        description: Some("Loose, garden-style roses".to_string()),
        image: ImageRef {
            asset: Some(ImageAsset {
                url: "https://cdn.example.com/garden.jpg".to_string(),
            }),
            alt: None,
        },
        order: Some(1.0),
        bouquet_sizes: vec![BouquetSize {
            id: "m".to_string(),
            name: "Medium".to_string(),
            number_of_roses: 24,
            price: Money::from_pence(6000),
        }],
        add_ons: vec![AddOn {
            id: "card".to_string(),
            name: "Gift Card".to_string(),
            price: Some(Money::from_pence(350)),
            requires_extra_info: true,
        }],
    }
}

#[tokio::test]
async fn test_basket_survives_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let image = gallery_image();

    {
        let mut store = CartStore::open(LocalStorage::new(temp_dir.path())).await;
        store.add_product(&product(), 2).await?;

        let mut custom = Customization::new(&image);
        custom.toggle_add_on("card")?;
        custom.set_detail("card", "Welcome to your new home");
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        store.add_custom(custom.build(now)?).await?;
    }

    assert!(temp_dir.path().join(CART_KEY).exists());
    assert!(temp_dir.path().join(CUSTOM_CART_KEY).exists());

    let store = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    let cart = store.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.custom_items().len(), 1);
    assert_eq!(
        cart.custom_items()[0].add_on_details.get("card").map(String::as_str),
        Some("Welcome to your new home")
    );
    assert_eq!(cart.count(), 3);
    assert_eq!(cart.subtotal(), Money::from_pence(7500 * 2 + 6350));
    Ok(())
}

#[tokio::test]
async fn test_stored_prices_are_pounds() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut store = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    store.add_product(&product(), 1).await?;

    let raw = tokio::fs::read_to_string(temp_dir.path().join(CART_KEY)).await?;
    let saved: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(saved[0]["_id"], "4");
    assert_eq!(saved[0]["price"], 75.0);
    assert_eq!(saved[0]["quantity"], 1);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_starts_empty_and_is_overwritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join(CART_KEY), b"<html>not json</html>").await?;

    let mut store = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    assert!(store.cart().is_empty());

    store.add_product(&product(), 1).await?;
    let reopened = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    assert_eq!(reopened.cart().items().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_quantity_and_clear_are_persisted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut store = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    store.add_product(&product(), 3).await?;

    assert!(store.update_quantity("4", -10).await?);
    assert!(!store.update_quantity("missing", 1).await?);
    let reopened = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    assert_eq!(reopened.cart().items()[0].quantity, 1);

    store.clear().await?;
    let reopened = CartStore::open(LocalStorage::new(temp_dir.path())).await;
    assert!(reopened.cart().is_empty());
    Ok(())
}
