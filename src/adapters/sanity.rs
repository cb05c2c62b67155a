use crate::domain::model::{
    CarouselImage, Faq, PageContent, Product, TermsAndConditions, Testimonial,
};
use crate::domain::ports::ContentSource;
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const PRODUCTS_QUERY: &str = r#"*[_type == "product"] | order(order asc) {
  _id, name, price, description, "imageUrl": image.asset->url, tags
}"#;

pub const PAGE_CONTENT_QUERY: &str = r#"*[_type == "pageContent"][0] { title, heroText, aboutText }"#;

pub const CAROUSEL_QUERY: &str = r#"*[_type == "carouselImage"] | order(order asc) {
  _id, title, description,
  image { asset-> { url }, alt },
  order,
  "bouquetSizes": bouquetSizes[]-> { _id, name, numberOfRoses, price },
  "addOns": addOns[]-> { _id, name, price, requiresExtraInfo }
}"#;

pub const TESTIMONIALS_QUERY: &str = r#"*[_type == "testimonial"] | order(_createdAt desc) {
  _id, name, text, rating, occasion
}"#;

pub const FAQ_QUERY: &str = r#"*[_type == "faq"][0] { title, questions[] { question, answer, order } }"#;

pub const TERMS_QUERY: &str = r#"*[_type == "termsAndConditions"][0] {
  title, lastUpdated, sections[] { heading, "content": pt::text(content) }
}"#;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Read-only client for the Sanity HTTP query API.
#[derive(Debug, Clone)]
pub struct SanityClient {
    client: Client,
    project_id: String,
    dataset: String,
    api_version: String,
    base_url: String,
}

impl SanityClient {
    pub fn new(project_id: &str, dataset: &str, api_version: &str, use_cdn: bool) -> Self {
        let host = if use_cdn { "apicdn" } else { "api" };
        Self {
            client: Client::new(),
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
            api_version: api_version.trim_start_matches('v').to_string(),
            base_url: format!("https://{}.{}.sanity.io", project_id, host),
        }
    }

    /// Points the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.base_url, self.api_version, self.dataset
        )
    }

    pub async fn fetch<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        tracing::debug!("Querying content backend: {}", self.query_url());
        let response = self
            .client
            .get(self.query_url())
            .query(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Content backend response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopError::ContentError {
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let body: QueryResponse<T> = response.json().await?;
        Ok(body.result)
    }

    /// Decodes a list result record by record; malformed records are skipped
    /// so one bad document doesn't empty the whole list.
    pub async fn fetch_list<T: DeserializeOwned>(&self, what: &str, query: &str) -> Result<Vec<T>> {
        let records: Option<Vec<serde_json::Value>> = self.fetch(query).await?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| {
                let id = record.get("_id").cloned().unwrap_or_default();
                serde_json::from_value(record)
                    .map_err(|e| tracing::warn!("⚠️ Skipping malformed {} {}: {}", what, id, e))
                    .ok()
            })
            .collect())
    }

    /// CDN URL for an image asset reference (`image-<id>-<w>x<h>-<ext>`),
    /// resized to `width` pixels.
    pub fn image_url(&self, asset_ref: &str, width: u32) -> Option<String> {
        let rest = asset_ref.strip_prefix("image-")?;
        let (stem, ext) = rest.rsplit_once('-')?;
        let (_, dimensions) = stem.rsplit_once('-')?;
        let (w, h) = dimensions.split_once('x')?;
        if w.parse::<u32>().is_err() || h.parse::<u32>().is_err() || ext.is_empty() {
            return None;
        }

        Some(format!(
            "https://cdn.sanity.io/images/{}/{}/{}.{}?w={}&auto=format",
            self.project_id, self.dataset, stem, ext, width
        ))
    }
}

#[async_trait]
impl ContentSource for SanityClient {
    async fn products(&self) -> Result<Vec<Product>> {
        self.fetch_list("product", PRODUCTS_QUERY).await
    }

    async fn page_content(&self) -> Result<Option<PageContent>> {
        self.fetch(PAGE_CONTENT_QUERY).await
    }

    async fn carousel_images(&self) -> Result<Vec<CarouselImage>> {
        self.fetch_list("carousel image", CAROUSEL_QUERY).await
    }

    async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        self.fetch_list("testimonial", TESTIMONIALS_QUERY).await
    }

    async fn faq(&self) -> Result<Option<Faq>> {
        self.fetch(FAQ_QUERY).await
    }

    async fn terms(&self) -> Result<Option<TermsAndConditions>> {
        self.fetch(TERMS_QUERY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_uses_cdn_host() {
        let cdn = SanityClient::new("il3vdy77", "production", "2024-01-01", true);
        assert_eq!(
            cdn.query_url(),
            "https://il3vdy77.apicdn.sanity.io/v2024-01-01/data/query/production"
        );

        let live = SanityClient::new("il3vdy77", "production", "v2024-01-01", false);
        assert_eq!(
            live.query_url(),
            "https://il3vdy77.api.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = SanityClient::new("p", "staging", "2024-01-01", true)
            .with_base_url("http://127.0.0.1:9999/");
        assert_eq!(
            client.query_url(),
            "http://127.0.0.1:9999/v2024-01-01/data/query/staging"
        );
    }

    #[test]
    fn test_image_url_from_asset_ref() {
        let client = SanityClient::new("il3vdy77", "production", "2024-01-01", true);
        assert_eq!(
            client.image_url("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg", 800),
            Some(
                "https://cdn.sanity.io/images/il3vdy77/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?w=800&auto=format"
                    .to_string()
            )
        );
        assert_eq!(client.image_url("file-abc-pdf", 800), None);
        assert_eq!(client.image_url("image-abc-widexhigh-png", 800), None);
    }
}
