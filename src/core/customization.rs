use crate::core::cart::MAX_QUANTITY;
use crate::domain::model::{AddOn, BouquetSize, CarouselImage, CartItemCustom};
use crate::domain::money::Money;
use crate::utils::error::{Result, ShopError};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// "Order something similar" for a gallery image: pick a size, optional
/// add-ons (some need extra text, e.g. a gift card message) and a quantity.
#[derive(Debug, Clone)]
pub struct Customization<'a> {
    image: &'a CarouselImage,
    size: Option<&'a BouquetSize>,
    selected_add_ons: BTreeSet<String>,
    details: BTreeMap<String, String>,
    quantity: u32,
}

impl<'a> Customization<'a> {
    /// The first size is pre-selected when the image offers any.
    pub fn new(image: &'a CarouselImage) -> Self {
        Self {
            image,
            size: image.bouquet_sizes.first(),
            selected_add_ons: BTreeSet::new(),
            details: BTreeMap::new(),
            quantity: 1,
        }
    }

    pub fn select_size(&mut self, size_id: &str) -> Result<()> {
        let size = self
            .image
            .find_size(size_id)
            .ok_or_else(|| ShopError::ValidationError {
                message: format!("'{}' has no size '{}'", self.image.title, size_id),
            })?;
        self.size = Some(size);
        Ok(())
    }

    /// Selecting an add-on twice deselects it and forgets its details.
    pub fn toggle_add_on(&mut self, add_on_id: &str) -> Result<bool> {
        if self.image.find_add_on(add_on_id).is_none() {
            return Err(ShopError::ValidationError {
                message: format!("'{}' has no add-on '{}'", self.image.title, add_on_id),
            });
        }
        if self.selected_add_ons.remove(add_on_id) {
            self.details.remove(add_on_id);
            Ok(false)
        } else {
            self.selected_add_ons.insert(add_on_id.to_string());
            Ok(true)
        }
    }

    pub fn set_detail(&mut self, add_on_id: &str, text: impl Into<String>) {
        self.details.insert(add_on_id.to_string(), text.into());
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, MAX_QUANTITY);
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn size(&self) -> Option<&BouquetSize> {
        self.size
    }

    pub fn selected_add_ons(&self) -> Vec<&AddOn> {
        self.image
            .add_ons
            .iter()
            .filter(|add_on| self.selected_add_ons.contains(&add_on.id))
            .collect()
    }

    pub fn total(&self) -> Money {
        let size_price = self.size.map(|size| size.price).unwrap_or(Money::ZERO);
        let add_ons: Money = self
            .selected_add_ons()
            .into_iter()
            .map(AddOn::price_or_zero)
            .sum();
        (size_price + add_ons) * self.quantity
    }

    /// Selected add-ons that need extra text but have none yet.
    pub fn missing_details(&self) -> Vec<&AddOn> {
        self.selected_add_ons()
            .into_iter()
            .filter(|add_on| add_on.requires_extra_info)
            .filter(|add_on| {
                self.details
                    .get(&add_on.id)
                    .map_or(true, |text| text.trim().is_empty())
            })
            .collect()
    }

    pub fn can_add(&self) -> bool {
        self.size.is_some() && self.missing_details().is_empty()
    }

    pub fn build(&self, now: DateTime<Utc>) -> Result<CartItemCustom> {
        let size = self.size.ok_or_else(|| ShopError::ValidationError {
            message: format!("choose a size for '{}'", self.image.title),
        })?;

        let missing = self.missing_details();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|add_on| add_on.name.as_str()).collect();
            return Err(ShopError::ValidationError {
                message: format!("add the details for: {}", names.join(", ")),
            });
        }

        let add_ons: Vec<AddOn> = self.selected_add_ons().into_iter().cloned().collect();
        let add_on_details = self
            .details
            .iter()
            .filter(|(id, _)| self.selected_add_ons.contains(*id))
            .map(|(id, text)| (id.clone(), text.trim().to_string()))
            .collect();

        Ok(CartItemCustom {
            id: format!("{}-{}", self.image.id, now.timestamp_millis()),
            name: self.image.title.clone(),
            image_url: self.image.image_url().to_string(),
            size: size.clone(),
            add_ons,
            add_on_details,
            quantity: self.quantity,
            total_price: self.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ImageAsset, ImageRef};
    use chrono::TimeZone;

    fn image() -> CarouselImage {
        CarouselImage {
            id: "img-1".to_string(),
            title: "Blush Peonies".to_string(),
            description: None,
            image: ImageRef {
                asset: Some(ImageAsset {
                    url: "https://cdn.example.com/peonies.jpg".to_string(),
                }),
                alt: None,
            },
            order: Some(1.0),
            bouquet_sizes: vec![
                BouquetSize {
                    id: "s".to_string(),
                    name: "Small".to_string(),
                    number_of_roses: 12,
                    price: Money::from_pence(4500),
                },
                BouquetSize {
                    id: "l".to_string(),
                    name: "Large".to_string(),
                    number_of_roses: 36,
                    price: Money::from_pence(9000),
                },
            ],
            add_ons: vec![
                AddOn {
                    id: "vase".to_string(),
                    name: "Vase".to_string(),
                    price: Some(Money::from_pence(1500)),
                    requires_extra_info: false,
                },
                AddOn {
                    id: "card".to_string(),
                    name: "Gift Card".to_string(),
                    price: Some(Money::from_pence(300)),
                    requires_extra_info: true,
                },
                AddOn {
                    id: "ribbon".to_string(),
                    name: "Ribbon".to_string(),
                    price: None,
                    requires_extra_info: false,
                },
            ],
        }
    }

    #[test]
    fn test_first_size_is_preselected() {
        let image = image();
        let custom = Customization::new(&image);
        assert_eq!(custom.size().unwrap().id, "s");
        assert_eq!(custom.total(), Money::from_pence(4500));
        assert!(custom.can_add());
    }

    #[test]
    fn test_total_includes_add_ons_times_quantity() {
        let image = image();
        let mut custom = Customization::new(&image);
        custom.select_size("l").unwrap();
        custom.toggle_add_on("vase").unwrap();
        custom.toggle_add_on("ribbon").unwrap();
        custom.set_quantity(2);

        assert_eq!(custom.total(), Money::from_pence((9000 + 1500) * 2));
    }

    #[test]
    fn test_required_details_block_adding() {
        let image = image();
        let mut custom = Customization::new(&image);
        custom.toggle_add_on("card").unwrap();
        assert!(!custom.can_add());

        custom.set_detail("card", "   ");
        assert!(!custom.can_add());

        custom.set_detail("card", "Happy birthday, Mum");
        assert!(custom.can_add());
    }

    #[test]
    fn test_deselecting_clears_details() {
        let image = image();
        let mut custom = Customization::new(&image);
        custom.toggle_add_on("card").unwrap();
        custom.set_detail("card", "Congratulations");
        assert_eq!(custom.toggle_add_on("card").unwrap(), false);

        custom.toggle_add_on("card").unwrap();
        assert_eq!(custom.missing_details().len(), 1);
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let image = image();
        let mut custom = Customization::new(&image);
        assert!(custom.select_size("xl").is_err());
        assert!(custom.toggle_add_on("chocolates").is_err());
    }

    #[test]
    fn test_build_cart_item() {
        let image = image();
        let mut custom = Customization::new(&image);
        custom.toggle_add_on("card").unwrap();
        custom.set_detail("card", " With love ");
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 9, 30, 0).unwrap();

        let item = custom.build(now).unwrap();

        assert_eq!(item.id, format!("img-1-{}", now.timestamp_millis()));
        assert_eq!(item.name, "Blush Peonies");
        assert_eq!(item.image_url, "https://cdn.example.com/peonies.jpg");
        assert_eq!(item.add_on_details.get("card").unwrap(), "With love");
        assert_eq!(item.total_price, Money::from_pence(4800));
        assert_eq!(item.unit_price(), item.total_price);
    }

    #[test]
    fn test_image_without_sizes_cannot_be_built() {
        let mut image = image();
        image.bouquet_sizes.clear();
        let custom = Customization::new(&image);

        assert!(!custom.can_add());
        assert!(custom.build(Utc::now()).is_err());
    }
}
