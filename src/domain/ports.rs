use crate::core::delivery::Coordinates;
use crate::core::order::{Order, SubmissionReceipt};
use crate::domain::model::{
    CarouselImage, Faq, PageContent, Product, TermsAndConditions, Testimonial,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Key/value persistence for the basket. A missing key reads as `None`.
pub trait Storage: Send + Sync {
    fn read_key(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_key(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read-only queries against the headless content backend, one per document type.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>>;
    async fn page_content(&self) -> Result<Option<PageContent>>;
    async fn carousel_images(&self) -> Result<Vec<CarouselImage>>;
    async fn testimonials(&self) -> Result<Vec<Testimonial>>;
    async fn faq(&self) -> Result<Option<Faq>>;
    async fn terms(&self) -> Result<Option<TermsAndConditions>>;
}

#[async_trait]
pub trait PostcodeLookup: Send + Sync {
    async fn locate(&self, postcode: &str) -> Result<Coordinates>;
}

#[async_trait]
pub trait OrderChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt>;
}
