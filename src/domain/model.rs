use crate::domain::money::Money;
use crate::utils::error::{Result as ShopResult, ShopError};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The content backend returns `null` for unset fields; treat those like absent ones.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "imageUrl", default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BouquetSize {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub number_of_roses: u32,
    pub price: Money,
}

impl Validate for BouquetSize {
    fn validate(&self) -> ShopResult<()> {
        if self.number_of_roses == 0 {
            return Err(ShopError::ValidationError {
                message: format!("bouquet size '{}' has no roses", self.id),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_extra_info: bool,
}

impl AddOn {
    pub fn price_or_zero(&self) -> Money {
        self.price.unwrap_or(Money::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselImage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: ImageRef,
    #[serde(default)]
    pub order: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bouquet_sizes: Vec<BouquetSize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub add_ons: Vec<AddOn>,
}

impl CarouselImage {
    pub fn image_url(&self) -> &str {
        self.image
            .asset
            .as_ref()
            .map(|asset| asset.url.as_str())
            .unwrap_or("")
    }

    /// Cheapest bouquet size, shown as "From £x".
    pub fn starting_price(&self) -> Option<Money> {
        self.bouquet_sizes.iter().map(|size| size.price).min()
    }

    pub fn find_size(&self, id: &str) -> Option<&BouquetSize> {
        self.bouquet_sizes.iter().find(|size| size.id == id)
    }

    pub fn find_add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }
}

/// Sorts by `order`, images without one last; ties keep their fetched order.
pub fn sort_by_display_order(images: &mut [CarouselImage]) {
    images.sort_by(|a, b| match (a.order, b.order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemCustom {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub size: BouquetSize,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub add_on_details: BTreeMap<String, String>,
    pub quantity: u32,
    pub total_price: Money,
}

impl CartItemCustom {
    /// Size plus add-ons for a single bouquet.
    pub fn unit_price(&self) -> Money {
        self.size.price + self.add_ons.iter().map(AddOn::price_or_zero).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub text: String,
    pub rating: u8,
    #[serde(default)]
    pub occasion: Option<String>,
}

impl Validate for Testimonial {
    fn validate(&self) -> ShopResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(ShopError::ValidationError {
                message: format!(
                    "testimonial '{}' has rating {}, expected 1 to 5",
                    self.id, self.rating
                ),
            });
        }
        Ok(())
    }
}

pub const DEFAULT_TITLE: &str = "The Bespoke Bouquet Co.";
pub const DEFAULT_HERO_TEXT: &str = "Nature's Artistry, Hand-Tied.";
pub const DEFAULT_ABOUT_TEXT: &str = "Crafting elegance from the finest seasonal blooms.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub hero_text: Option<String>,
    #[serde(default)]
    pub about_text: Option<String>,
}

impl PageContent {
    pub fn title(&self) -> &str {
        non_blank(&self.title).unwrap_or(DEFAULT_TITLE)
    }

    pub fn hero_text(&self) -> &str {
        non_blank(&self.hero_text).unwrap_or(DEFAULT_HERO_TEXT)
    }

    pub fn about_text(&self) -> &str {
        non_blank(&self.about_text).unwrap_or(DEFAULT_ABOUT_TEXT)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub order: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<FaqItem>,
}

impl Faq {
    pub fn title(&self) -> &str {
        non_blank(&self.title).unwrap_or("Frequently Asked Questions")
    }

    /// Lower `order` first; unordered questions keep their place after the ordered ones.
    pub fn sorted_questions(&self) -> Vec<&FaqItem> {
        let mut questions: Vec<&FaqItem> = self.questions.iter().collect();
        questions.sort_by(|a, b| match (a.order, b.order) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        questions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsSection {
    pub heading: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsAndConditions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<TermsSection>,
}

/// Everything the storefront shows, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub page: PageContent,
    pub carousel: Vec<CarouselImage>,
    pub testimonials: Vec<Testimonial>,
    pub faq: Faq,
    pub terms: TermsAndConditions,
}

impl Catalog {
    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn find_carousel_image(&self, id: &str) -> Option<&CarouselImage> {
        self.carousel.iter().find(|image| image.id == id)
    }
}
