use crate::adapters::emailjs::EmailRelayConfig;
use crate::adapters::messaging::MessagingConfig;
use crate::adapters::postcodes::DEFAULT_POSTCODES_URL;
use crate::core::delivery::{DeliveryPolicy, Shop};
use crate::domain::money::Money;
use crate::field::particle::{FieldParams, Viewport, DEFAULT_PARTICLE_COUNT};
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub delivery: DeliveryConfig,
    pub orders: OrdersConfig,
    pub field: FieldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Overrides the host derived from `project_id`.
    pub base_url: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: "il3vdy77".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("./.bespoke-bouquet")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub postcode_api: Option<String>,
    pub local_radius_miles: Option<f64>,
    pub local_base_fee: Option<Money>,
    pub local_fee_per_mile: Option<Money>,
    pub remote_flat_rate: Option<Money>,
    pub shops: Option<Vec<Shop>>,
}

impl DeliveryConfig {
    pub fn postcode_api(&self) -> &str {
        self.postcode_api.as_deref().unwrap_or(DEFAULT_POSTCODES_URL)
    }

    /// Unset values fall back to [`DeliveryPolicy::default`].
    pub fn policy(&self) -> DeliveryPolicy {
        let defaults = DeliveryPolicy::default();
        DeliveryPolicy {
            shops: self.shops.clone().unwrap_or(defaults.shops),
            local_radius_miles: self
                .local_radius_miles
                .unwrap_or(defaults.local_radius_miles),
            local_base_fee: self.local_base_fee.unwrap_or(defaults.local_base_fee),
            local_fee_per_mile: self
                .local_fee_per_mile
                .unwrap_or(defaults.local_fee_per_mile),
            remote_flat_rate: self.remote_flat_rate.unwrap_or(defaults.remote_flat_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Email,
    Messaging,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersConfig {
    pub default_channel: Option<ChannelKind>,
    pub email: Option<EmailRelayConfig>,
    pub messaging: Option<MessagingConfig>,
}

impl OrdersConfig {
    pub fn default_channel(&self) -> ChannelKind {
        self.default_channel.unwrap_or_default()
    }

    pub fn messaging(&self) -> MessagingConfig {
        self.messaging.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particles: usize,
    pub seed: u64,
    pub frame_rate: f32,
    pub params: FieldParams,
    pub viewport: Viewport,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particles: DEFAULT_PARTICLE_COUNT,
            seed: 7,
            frame_rate: 60.0,
            params: FieldParams::default(),
            viewport: Viewport::default(),
        }
    }
}

impl ShopConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShopError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMAILJS_PUBLIC_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("content.project_id", &self.content.project_id)?;
        validate_non_empty_string("content.dataset", &self.content.dataset)?;
        if let Some(base_url) = &self.content.base_url {
            validate_url("content.base_url", base_url)?;
        }

        validate_path("storage.path", self.storage.path())?;

        validate_url("delivery.postcode_api", self.delivery.postcode_api())?;
        self.delivery.policy().validate()?;

        if let Some(email) = &self.orders.email {
            email.validate()?;
        } else if self.orders.default_channel() == ChannelKind::Email {
            tracing::debug!("No [orders.email] section, email orders fall back to messaging");
        }
        self.orders.messaging().validate()?;

        validate_positive_number("field.particles", self.field.particles, 1)?;
        validate_range("field.frame_rate", self.field.frame_rate, 1.0, 1000.0)?;
        validate_range("field.params.damping", self.field.params.damping, 0.0, 1.0)?;
        validate_range(
            "field.params.rotation_follow",
            self.field.params.rotation_follow,
            0.0,
            1.0,
        )?;
        validate_range(
            "field.params.interaction_radius",
            self.field.params.interaction_radius,
            0.0,
            f32::MAX,
        )?;

        Ok(())
    }
}

impl Validate for ShopConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::messaging::MessagingPlatform;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ShopConfig::from_toml_str("").unwrap();

        assert_eq!(config.content.project_id, "il3vdy77");
        assert!(config.content.use_cdn);
        assert_eq!(config.storage.path(), "./.bespoke-bouquet");
        assert_eq!(config.delivery.policy(), DeliveryPolicy::default());
        assert_eq!(config.orders.default_channel(), ChannelKind::Email);
        assert_eq!(config.field.particles, 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[content]
project_id = "abc123"
dataset = "staging"
use_cdn = false

[storage]
path = "/tmp/bouquet"

[delivery]
local_radius_miles = 5.0
local_base_fee = 4.5
remote_flat_rate = 12.0

[[delivery.shops]]
name = "Bath"
latitude = 51.3811
longitude = -2.3590

[orders]
default_channel = "messaging"

[orders.email]
service_id = "service_x"
owner_template_id = "template_owner"
customer_template_id = "template_customer"
public_key = "pk"

[orders.messaging]
platform = "whatsapp"
handle = "447700900123"

[field]
particles = 30
seed = 42

[field.params]
damping = 0.9
float_amplitude = [0.1, 0.1, 0.1]
"#;

        let config = ShopConfig::from_toml_str(toml_content).unwrap();
        let policy = config.delivery.policy();

        assert_eq!(config.content.dataset, "staging");
        assert_eq!(config.content.api_version, "2024-01-01");
        assert_eq!(policy.shops.len(), 1);
        assert_eq!(policy.shops[0].name, "Bath");
        assert_eq!(policy.local_base_fee, Money::from_pence(450));
        assert_eq!(policy.remote_flat_rate, Money::from_pence(1200));
        assert_eq!(policy.local_fee_per_mile, Money::from_pence(322));
        assert_eq!(config.orders.default_channel(), ChannelKind::Messaging);
        assert_eq!(config.orders.messaging().platform, MessagingPlatform::Whatsapp);
        assert_eq!(config.field.particles, 30);
        assert_eq!(config.field.params.damping, 0.9);
        assert_eq!(config.field.params.spring_strength, 0.02);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_EMAILJS_PUBLIC_KEY", "pk_from_env");

        let toml_content = r#"
[orders.email]
service_id = "service_x"
owner_template_id = "a"
customer_template_id = "b"
public_key = "${TEST_EMAILJS_PUBLIC_KEY}"
access_token = "${TEST_UNSET_TOKEN_VAR}"
"#;

        let config = ShopConfig::from_toml_str(toml_content).unwrap();
        let email = config.orders.email.unwrap();
        assert_eq!(email.public_key, "pk_from_env");
        assert_eq!(email.access_token.as_deref(), Some("${TEST_UNSET_TOKEN_VAR}"));

        std::env::remove_var("TEST_EMAILJS_PUBLIC_KEY");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = ShopConfig::from_toml_str(
            r#"
[delivery]
postcode_api = "not-a-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let no_particles = ShopConfig::from_toml_str(
            r#"
[field]
particles = 0
"#,
        )
        .unwrap();
        assert!(no_particles.validate().is_err());

        let no_shops = ShopConfig::from_toml_str(
            r#"
[delivery]
shops = []
"#,
        )
        .unwrap();
        assert!(no_shops.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ShopConfig::from_toml_str("[content\nproject_id = 1").unwrap_err();
        assert!(matches!(err, ShopError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\npath = \"./state\"\n")
            .unwrap();

        let config = ShopConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.storage.path(), "./state");
    }
}
