use crate::core::delivery::{normalize_postcode, Coordinates};
use crate::domain::ports::PostcodeLookup;
use crate::utils::error::{Result, ShopError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_POSTCODES_URL: &str = "https://api.postcodes.io";

#[derive(Deserialize)]
struct LookupResponse {
    result: Option<LookupResult>,
}

#[derive(Deserialize)]
struct LookupResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// UK postcode → coordinates via postcodes.io.
#[derive(Debug, Clone)]
pub struct PostcodesIoClient {
    client: Client,
    base_url: String,
}

impl Default for PostcodesIoClient {
    fn default() -> Self {
        Self::new(DEFAULT_POSTCODES_URL)
    }
}

impl PostcodesIoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn lookup_url(&self, postcode: &str) -> String {
        let compact: String = normalize_postcode(postcode)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        format!("{}/postcodes/{}", self.base_url, compact)
    }

    fn lookup_error(postcode: &str, message: impl Into<String>) -> ShopError {
        ShopError::PostcodeLookupError {
            postcode: postcode.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl PostcodeLookup for PostcodesIoClient {
    async fn locate(&self, postcode: &str) -> Result<Coordinates> {
        let url = self.lookup_url(postcode);
        tracing::debug!("Looking up postcode: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::lookup_error(postcode, e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ShopError::PostcodeNotFound {
                    postcode: postcode.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(Self::lookup_error(postcode, format!("HTTP {}", status)))
            }
            _ => {}
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| Self::lookup_error(postcode, e.to_string()))?;

        // 部分郵遞區號（例如郵政信箱）沒有座標
        match body.result {
            Some(LookupResult {
                latitude: Some(latitude),
                longitude: Some(longitude),
            }) => Ok(Coordinates::new(latitude, longitude)),
            _ => Err(Self::lookup_error(postcode, "no coordinates for postcode")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url_strips_spaces() {
        let client = PostcodesIoClient::default();
        assert_eq!(
            client.lookup_url(" sw1a 1aa "),
            "https://api.postcodes.io/postcodes/SW1A1AA"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let client = PostcodesIoClient::new("http://localhost:8080/");
        assert_eq!(
            client.lookup_url("EC1A 1BB"),
            "http://localhost:8080/postcodes/EC1A1BB"
        );
    }
}
