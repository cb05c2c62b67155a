use crate::domain::model::{sort_by_display_order, Catalog, Testimonial};
use crate::domain::ports::ContentSource;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use tokio::sync::OnceCell;

/// Loads the catalog from a [`ContentSource`] once and serves it from memory.
pub struct Storefront<C: ContentSource> {
    source: C,
    catalog: OnceCell<Catalog>,
}

impl<C: ContentSource> Storefront<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
        }
    }

    pub async fn catalog(&self) -> &Catalog {
        self.catalog.get_or_init(|| self.load_catalog()).await
    }

    /// Drops the cached catalog and loads a fresh one.
    pub async fn refresh(&mut self) -> &Catalog {
        let fresh = self.load_catalog().await;
        self.catalog = OnceCell::new_with(Some(fresh));
        self.catalog().await
    }

    /// Queries every document type concurrently. A failed query falls back to
    /// that type's defaults so one broken document never blanks the site.
    pub async fn load_catalog(&self) -> Catalog {
        tracing::info!("🌸 Loading catalog from content backend");

        let (products, page, carousel, testimonials, faq, terms) = tokio::join!(
            self.source.products(),
            self.source.page_content(),
            self.source.carousel_images(),
            self.source.testimonials(),
            self.source.faq(),
            self.source.terms(),
        );

        let mut carousel = or_default("carousel images", carousel);
        sort_by_display_order(&mut carousel);
        for image in &mut carousel {
            retain_valid("bouquet size", &mut image.bouquet_sizes);
        }

        let mut testimonials = or_default("testimonials", testimonials);
        retain_valid("testimonial", &mut testimonials);
        if testimonials.is_empty() {
            testimonials = default_testimonials();
        }

        let catalog = Catalog {
            products: or_default("products", products),
            page: or_default("page content", page).unwrap_or_default(),
            carousel,
            testimonials,
            faq: or_default("faq", faq).unwrap_or_default(),
            terms: or_default("terms", terms).unwrap_or_default(),
        };

        tracing::info!(
            "✅ Catalog ready: {} products, {} gallery images, {} testimonials",
            catalog.products.len(),
            catalog.carousel.len(),
            catalog.testimonials.len()
        );
        catalog
    }
}

fn or_default<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("⚠️ Could not load {}: {}", what, e);
        T::default()
    })
}

/// Drops records that break their invariants instead of showing them.
fn retain_valid<T: Validate>(what: &str, records: &mut Vec<T>) {
    records.retain(|record| match record.validate() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("⚠️ Skipping {}: {}", what, e);
            false
        }
    });
}

/// Shown when the content backend has no testimonials.
pub fn default_testimonials() -> Vec<Testimonial> {
    [
        ("Sarah M.", "Absolutely stunning arrangement! The roses were so fresh and the colours were even more beautiful in person.", "Anniversary"),
        ("James & Emily", "Our wedding flowers were beyond perfect. Everyone commented on how gorgeous they were!", "Wedding"),
        ("Charlotte W.", "The attention to detail is incredible. My mum cried happy tears when she received her birthday bouquet.", "Birthday"),
        ("David R.", "Best florist I've ever used. The personal delivery service made it extra special.", "Just Because"),
        ("Hannah L.", "I order monthly for my office and they never disappoint. Fresh, vibrant, and always on time.", "Regular Order"),
        ("Michael & Sophie", "The sympathy flowers were elegant and tasteful. Thank you for handling everything with such care.", "Sympathy"),
        ("Rebecca T.", "Ordered for Valentine's Day and wow! The presentation was exquisite. Will definitely be back.", "Valentine's Day"),
        ("Oliver & Grace", "They brought our vision to life for our garden party. Magical arrangements throughout!", "Event"),
        ("Lucy P.", "Such a personal touch with every order. You can tell they truly love what they do.", "Thank You"),
        ("Tom & Anna", "The bouquet lasted over two weeks! Incredible quality and value.", "New Home"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, text, occasion))| Testimonial {
        id: (i + 1).to_string(),
        name: name.to_string(),
        text: text.to_string(),
        rating: 5,
        occasion: Some(occasion.to_string()),
    })
    .collect()
}
