use crate::core::order::{Handoff, Order, SubmissionReceipt};
use crate::domain::ports::OrderChannel;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingPlatform {
    Whatsapp,
    Instagram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagingConfig {
    pub platform: MessagingPlatform,
    /// WhatsApp number in international format, or the Instagram handle.
    pub handle: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            platform: MessagingPlatform::Instagram,
            handle: "thebespokebouquetco".to_string(),
        }
    }
}

impl Validate for MessagingConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("orders.messaging.handle", &self.handle)?;
        if self.platform == MessagingPlatform::Whatsapp
            && !self
                .handle
                .trim_start_matches('+')
                .chars()
                .all(|c| c.is_ascii_digit())
        {
            return Err(ShopError::InvalidConfigValueError {
                field: "orders.messaging.handle".to_string(),
                value: self.handle.clone(),
                reason: "WhatsApp numbers must be digits in international format".to_string(),
            });
        }
        Ok(())
    }
}

/// Hands the order over to the customer: a ready-to-send message and a link
/// that opens a chat with the shop. Nothing leaves the machine.
pub struct MessagingHandoff {
    config: MessagingConfig,
}

impl MessagingHandoff {
    pub fn new(config: MessagingConfig) -> Self {
        Self { config }
    }

    pub fn message(&self, order: &Order) -> String {
        format!(
            "Hello! I'd like to place an order with The Bespoke Bouquet Co.\n\n{}",
            order.summary_text()
        )
    }

    pub fn link(&self, message: &str) -> String {
        match self.config.platform {
            MessagingPlatform::Whatsapp => {
                let number = self.config.handle.trim_start_matches('+');
                let query: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("text", message)
                    .finish();
                format!("https://wa.me/{}?{}", number, query)
            }
            // Instagram 私訊不支援預填文字
            MessagingPlatform::Instagram => {
                format!("https://ig.me/m/{}", self.config.handle.trim_start_matches('@'))
            }
        }
    }

    pub fn handoff(&self, order: &Order) -> Handoff {
        let message = self.message(order);
        Handoff {
            link: self.link(&message),
            message,
        }
    }
}

#[async_trait]
impl OrderChannel for MessagingHandoff {
    fn name(&self) -> &'static str {
        "messaging"
    }

    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt> {
        let handoff = self.handoff(order);
        tracing::info!("💬 Order {} ready to send via {}", order.reference, handoff.link);
        Ok(SubmissionReceipt {
            channel: self.name().to_string(),
            reference: order.reference.clone(),
            handoff: Some(handoff),
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let handoff = MessagingHandoff::new(MessagingConfig {
            platform: MessagingPlatform::Whatsapp,
            handle: "+447700900123".to_string(),
        });
        assert_eq!(
            handoff.link("Order BB-1 & roses"),
            "https://wa.me/447700900123?text=Order+BB-1+%26+roses"
        );
    }

    #[test]
    fn test_instagram_link() {
        let handoff = MessagingHandoff::new(MessagingConfig {
            platform: MessagingPlatform::Instagram,
            handle: "@thebespokebouquetco".to_string(),
        });
        assert_eq!(
            handoff.link("ignored"),
            "https://ig.me/m/thebespokebouquetco"
        );
    }

    #[test]
    fn test_whatsapp_handle_must_be_numeric() {
        let config = MessagingConfig {
            platform: MessagingPlatform::Whatsapp,
            handle: "shop".to_string(),
        };
        assert!(config.validate().is_err());
        assert!(MessagingConfig::default().validate().is_ok());
    }
}
