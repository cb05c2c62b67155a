use crate::core::order::{Order, SubmissionReceipt};
use crate::domain::ports::OrderChannel;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRelayConfig {
    pub endpoint: Option<String>,
    pub service_id: String,
    /// Template sent to the shop owner.
    pub owner_template_id: String,
    /// Confirmation template sent to the customer.
    pub customer_template_id: String,
    pub public_key: String,
    pub access_token: Option<String>,
    /// Recipient of the shop notification. Unset means the owner template's
    /// own recipient in the EmailJS dashboard.
    pub owner_email: Option<String>,
}

impl EmailRelayConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_EMAILJS_ENDPOINT)
            .trim_end_matches('/')
    }
}

impl Validate for EmailRelayConfig {
    fn validate(&self) -> Result<()> {
        validate_url("orders.email.endpoint", self.endpoint())?;
        validate_non_empty_string("orders.email.service_id", &self.service_id)?;
        validate_non_empty_string("orders.email.owner_template_id", &self.owner_template_id)?;
        validate_non_empty_string(
            "orders.email.customer_template_id",
            &self.customer_template_id,
        )?;
        validate_non_empty_string("orders.email.public_key", &self.public_key)?;
        if let Some(owner_email) = &self.owner_email {
            validate_non_empty_string("orders.email.owner_email", owner_email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Clone, Serialize)]
struct TemplateParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to_email: Option<&'a str>,
    reply_to: &'a str,
    order_reference: &'a str,
    customer_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    delivery_address: String,
    delivery_date: String,
    total: String,
    order_summary: String,
}

/// Sends the order through the EmailJS REST relay: one email to the shop,
/// then a confirmation to the customer.
pub struct EmailRelay {
    client: Client,
    config: EmailRelayConfig,
}

impl EmailRelay {
    pub fn new(config: EmailRelayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn send_url(&self) -> String {
        format!("{}/api/v1.0/email/send", self.config.endpoint())
    }

    fn failure(message: impl Into<String>) -> ShopError {
        ShopError::OrderSubmissionError {
            channel: "email".to_string(),
            message: message.into(),
        }
    }

    fn template_params<'a>(order: &'a Order, to_email: Option<&'a str>) -> TemplateParams<'a> {
        let customer = &order.customer;
        TemplateParams {
            to_email,
            reply_to: &customer.email,
            order_reference: &order.reference,
            customer_name: &customer.name,
            customer_email: &customer.email,
            customer_phone: &customer.phone,
            delivery_address: format!("{}, {}", customer.address, customer.postcode),
            delivery_date: customer.delivery_date.format("%d/%m/%Y").to_string(),
            total: order.total.to_string(),
            order_summary: order.summary_text(),
        }
    }

    async fn send(&self, template_id: &str, params: TemplateParams<'_>) -> Result<()> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id,
            user_id: &self.config.public_key,
            access_token: self.config.access_token.as_deref(),
            template_params: params,
        };

        let response = self
            .client
            .post(self.send_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::failure(format!(
                "template {} rejected with HTTP {}: {}",
                template_id,
                status,
                body.trim()
            )));
        }
        tracing::debug!("📧 Template {} accepted", template_id);
        Ok(())
    }
}

#[async_trait]
impl OrderChannel for EmailRelay {
    fn name(&self) -> &'static str {
        "email"
    }

    /// The order counts as placed once the shop notification is accepted; a
    /// failed customer confirmation only adds a warning to the receipt.
    async fn submit(&self, order: &Order) -> Result<SubmissionReceipt> {
        let customer = &order.customer;
        let owner_email = self.config.owner_email.as_deref();

        tracing::info!("📧 Sending order {} to the shop", order.reference);
        self.send(
            &self.config.owner_template_id,
            Self::template_params(order, owner_email),
        )
        .await?;

        let mut warnings = Vec::new();
        tracing::info!("📧 Sending confirmation to {}", customer.email);
        if let Err(e) = self
            .send(
                &self.config.customer_template_id,
                Self::template_params(order, Some(&customer.email)),
            )
            .await
        {
            tracing::warn!("⚠️ Order {} placed, confirmation failed: {}", order.reference, e);
            warnings.push(format!(
                "Your order reached us, but the confirmation email to {} could not be sent",
                customer.email
            ));
        }

        Ok(SubmissionReceipt {
            channel: self.name().to_string(),
            reference: order.reference.clone(),
            handoff: None,
            warnings,
        })
    }
}
