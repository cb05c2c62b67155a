use crate::core::cart::Cart;
use crate::core::delivery::{normalize_postcode, DeliveryQuote};
use crate::core::order::{Customer, Order};
use crate::utils::error::{Result, ShopError};
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
// 07xxx xxxxxx / 01xxx / +44 7xxx，空白與連字號先移除
static UK_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+44|0)\d{9,10}$").expect("phone pattern"));
static UK_POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}$").expect("postcode pattern")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postcode: String,
    pub delivery_date: Option<NaiveDate>,
    pub card_message: Option<String>,
    pub notes: Option<String>,
    pub accepted_terms: bool,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_uk_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    UK_PHONE_RE.is_match(&compact)
}

pub fn is_valid_uk_postcode(postcode: &str) -> bool {
    UK_POSTCODE_RE.is_match(&normalize_postcode(postcode))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

impl CheckoutForm {
    /// Every problem with the form, in field order. Empty when the form is complete.
    pub fn validate(&self, today: NaiveDate) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if !is_valid_email(&self.email) {
            errors.push("Enter a valid email address".to_string());
        }
        if !is_valid_uk_phone(&self.phone) {
            errors.push("Enter a valid UK phone number".to_string());
        }
        if self.address.trim().is_empty() {
            errors.push("Delivery address is required".to_string());
        }
        if !is_valid_uk_postcode(&self.postcode) {
            errors.push("Enter a valid UK postcode".to_string());
        }
        match self.delivery_date {
            None => errors.push("Choose a delivery date".to_string()),
            Some(date) if date < today => {
                errors.push("Delivery date cannot be in the past".to_string())
            }
            Some(_) => {}
        }
        if !self.accepted_terms {
            errors.push("Please accept the terms and conditions".to_string());
        }

        errors
    }

    fn into_customer(self, delivery_date: NaiveDate) -> Customer {
        Customer {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            postcode: normalize_postcode(&self.postcode),
            delivery_date,
            card_message: non_blank(&self.card_message),
            notes: non_blank(&self.notes),
        }
    }
}

pub struct Checkout;

impl Checkout {
    /// Builds the order once the form, the basket and the delivery quote all check out.
    pub fn prepare(
        form: CheckoutForm,
        cart: &Cart,
        quote: Option<&DeliveryQuote>,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let mut errors = form.validate(now.date_naive());

        if cart.is_empty() {
            errors.push("Your basket is empty".to_string());
        }
        let form_postcode = normalize_postcode(&form.postcode);
        match quote {
            None => errors.push("Check delivery for your postcode first".to_string()),
            Some(quote) if normalize_postcode(&quote.postcode) != form_postcode => {
                errors.push(format!(
                    "Delivery was quoted for {}, not {}",
                    normalize_postcode(&quote.postcode),
                    form_postcode
                ));
            }
            Some(_) => {}
        }

        let (Some(quote), Some(delivery_date), true) = (quote, form.delivery_date, errors.is_empty())
        else {
            tracing::debug!("🧾 Checkout rejected: {}", errors.join("; "));
            return Err(ShopError::CheckoutValidationError { errors });
        };

        let order = Order::new(form.into_customer(delivery_date), cart, quote.clone(), now);
        tracing::info!("🧾 Prepared order {} ({})", order.reference, order.total);
        Ok(order)
    }
}
