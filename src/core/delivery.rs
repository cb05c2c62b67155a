use crate::domain::money::Money;
use crate::domain::ports::PostcodeLookup;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance in miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Shop {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Validate for Shop {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("delivery.shops.name", &self.name)?;
        validate_range("delivery.shops.latitude", self.latitude, -90.0, 90.0)?;
        validate_range("delivery.shops.longitude", self.longitude, -180.0, 180.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPolicy {
    pub shops: Vec<Shop>,
    pub local_radius_miles: f64,
    pub local_base_fee: Money,
    pub local_fee_per_mile: Money,
    pub remote_flat_rate: Money,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            shops: vec![
                Shop {
                    name: "London".to_string(),
                    latitude: 51.5074,
                    longitude: -0.1278,
                },
                Shop {
                    name: "Bristol".to_string(),
                    latitude: 51.4545,
                    longitude: -2.5879,
                },
            ],
            local_radius_miles: 10.0,
            local_base_fee: Money::from_pence(500),
            // £2 per km
            local_fee_per_mile: Money::from_pence(322),
            remote_flat_rate: Money::from_pence(850),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeliveryKind {
    /// Hand delivered from the nearest shop.
    Local { shop: String, distance_miles: f64 },
    /// Courier, flat rate.
    Remote { nearest_distance_miles: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryQuote {
    pub postcode: String,
    #[serde(flatten)]
    pub kind: DeliveryKind,
    pub fee: Money,
}

impl DeliveryQuote {
    pub fn is_local(&self) -> bool {
        matches!(self.kind, DeliveryKind::Local { .. })
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            DeliveryKind::Local {
                shop,
                distance_miles,
            } => format!(
                "Local delivery from {} ({:.1} miles): {}",
                shop, distance_miles, self.fee
            ),
            DeliveryKind::Remote {
                nearest_distance_miles,
            } => format!(
                "Courier delivery ({:.1} miles from the nearest shop): {}",
                nearest_distance_miles, self.fee
            ),
        }
    }
}

impl DeliveryPolicy {
    fn nearest_shop(&self, destination: Coordinates) -> Option<(&Shop, f64)> {
        self.shops
            .iter()
            .map(|shop| (shop, haversine_miles(shop.coordinates(), destination)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn classify(&self, postcode: &str, destination: Coordinates) -> Result<DeliveryQuote> {
        let (shop, distance) =
            self.nearest_shop(destination)
                .ok_or_else(|| ShopError::MissingConfigError {
                    field: "delivery.shops".to_string(),
                })?;

        let quote = if distance <= self.local_radius_miles {
            let per_mile = Money::from_pounds(self.local_fee_per_mile.as_pounds() * distance);
            DeliveryQuote {
                postcode: postcode.to_string(),
                kind: DeliveryKind::Local {
                    shop: shop.name.clone(),
                    distance_miles: distance,
                },
                fee: self.local_base_fee + per_mile,
            }
        } else {
            DeliveryQuote {
                postcode: postcode.to_string(),
                kind: DeliveryKind::Remote {
                    nearest_distance_miles: distance,
                },
                fee: self.remote_flat_rate,
            }
        };
        Ok(quote)
    }
}

impl Validate for DeliveryPolicy {
    fn validate(&self) -> Result<()> {
        if self.shops.is_empty() {
            return Err(ShopError::MissingConfigError {
                field: "delivery.shops".to_string(),
            });
        }
        for shop in &self.shops {
            shop.validate()?;
        }
        validate_range(
            "delivery.local_radius_miles",
            self.local_radius_miles,
            0.0,
            500.0,
        )?;
        Ok(())
    }
}

/// Canonical `OUTWARD INWARD` form: uppercase, one space before the last
/// three characters ("ec1a1bb" and " ec1a  1bb" → "EC1A 1BB").
pub fn normalize_postcode(postcode: &str) -> String {
    let compact: String = postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    // 內碼固定三碼
    match compact.char_indices().rev().nth(2) {
        Some((split, _)) if split > 0 => format!("{} {}", &compact[..split], &compact[split..]),
        _ => compact,
    }
}

pub struct DeliveryQuoter<L: PostcodeLookup> {
    lookup: L,
    policy: DeliveryPolicy,
}

impl<L: PostcodeLookup> DeliveryQuoter<L> {
    pub fn new(lookup: L, policy: DeliveryPolicy) -> Self {
        Self { lookup, policy }
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    pub async fn quote(&self, postcode: &str) -> Result<DeliveryQuote> {
        let postcode = normalize_postcode(postcode);
        if postcode.is_empty() {
            return Err(ShopError::ValidationError {
                message: "postcode is empty".to_string(),
            });
        }

        let coordinates = self.lookup.locate(&postcode).await?;
        let quote = self.policy.classify(&postcode, coordinates)?;
        tracing::info!("🚚 {}: {}", postcode, quote.describe());
        Ok(quote)
    }
}
