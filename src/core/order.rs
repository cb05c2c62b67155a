use crate::core::cart::Cart;
use crate::core::delivery::DeliveryQuote;
use crate::domain::model::{CartItem, CartItemCustom};
use crate::domain::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postcode: String,
    pub delivery_date: NaiveDate,
    pub card_message: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    /// Size and add-on lines for customised bouquets.
    pub details: Vec<String>,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.product.name.clone(),
            quantity: item.quantity,
            unit_price: item.product.price,
            line_total: item.line_total(),
            details: Vec::new(),
        }
    }
}

impl From<&CartItemCustom> for OrderLine {
    fn from(item: &CartItemCustom) -> Self {
        let mut details = vec![format!(
            "Size: {} ({} roses)",
            item.size.name, item.size.number_of_roses
        )];
        for add_on in &item.add_ons {
            match item.add_on_details.get(&add_on.id) {
                Some(text) => details.push(format!("Add-on: {} \"{}\"", add_on.name, text)),
                None => details.push(format!("Add-on: {}", add_on.name)),
            }
        }

        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price(),
            line_total: item.total_price,
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub reference: String,
    pub placed_at: DateTime<Utc>,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
    pub delivery: DeliveryQuote,
    pub total: Money,
}

/// `BB-YYYYMMDD-HHMMSS`
pub fn order_reference(now: DateTime<Utc>) -> String {
    format!("BB-{}", now.format("%Y%m%d-%H%M%S"))
}

impl Order {
    pub fn new(customer: Customer, cart: &Cart, delivery: DeliveryQuote, now: DateTime<Utc>) -> Self {
        let lines: Vec<OrderLine> = cart
            .items()
            .iter()
            .map(OrderLine::from)
            .chain(cart.custom_items().iter().map(OrderLine::from))
            .collect();
        let subtotal = cart.subtotal();
        let total = subtotal + delivery.fee;

        Self {
            reference: order_reference(now),
            placed_at: now,
            customer,
            lines,
            subtotal,
            delivery,
            total,
        }
    }

    /// Plain-text order summary shared by the email and messaging channels.
    pub fn summary_text(&self) -> String {
        let c = &self.customer;
        let mut out = String::new();
        // String 的 fmt::Write 不會失敗
        let _ = writeln!(out, "Order {}", self.reference);
        let _ = writeln!(out);
        let _ = writeln!(out, "Name: {}", c.name);
        let _ = writeln!(out, "Email: {}", c.email);
        let _ = writeln!(out, "Phone: {}", c.phone);
        let _ = writeln!(out, "Address: {}, {}", c.address, c.postcode);
        let _ = writeln!(out, "Delivery date: {}", c.delivery_date.format("%d/%m/%Y"));
        let _ = writeln!(out);
        let _ = writeln!(out, "Items:");
        for line in &self.lines {
            let _ = writeln!(
                out,
                "- {} x {} ({} each) = {}",
                line.quantity, line.name, line.unit_price, line.line_total
            );
            for detail in &line.details {
                let _ = writeln!(out, "    {}", detail);
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Subtotal: {}", self.subtotal);
        let _ = writeln!(out, "{}", self.delivery.describe());
        let _ = writeln!(out, "Total: {}", self.total);
        if let Some(message) = &c.card_message {
            let _ = writeln!(out, "Card message: {}", message);
        }
        if let Some(notes) = &c.notes {
            let _ = writeln!(out, "Notes: {}", notes);
        }
        out.trim_end().to_string()
    }
}

/// What the customer should do next after a channel accepted the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handoff {
    pub link: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub channel: String,
    pub reference: String,
    /// Set by channels that need the customer to send the message themselves.
    pub handoff: Option<Handoff>,
    /// Problems after the order was accepted, e.g. a missing confirmation email.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delivery::DeliveryKind;
    use crate::domain::model::{AddOn, BouquetSize, Product};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn cart() -> Cart {
        let mut cart = Cart::default();
        cart.add_product(
            &Product {
                id: "1".to_string(),
                name: "Classic Red".to_string(),
                price: Money::from_pence(8500),
                description: String::new(),
                image_url: String::new(),
                tags: vec![],
            },
            2,
        );
        cart.add_custom(CartItemCustom {
            id: "img-1-1".to_string(),
            name: "Blush Peonies".to_string(),
            image_url: String::new(),
            size: BouquetSize {
                id: "l".to_string(),
                name: "Large".to_string(),
                number_of_roses: 36,
                price: Money::from_pence(9000),
            },
            add_ons: vec![
                AddOn {
                    id: "card".to_string(),
                    name: "Gift Card".to_string(),
                    price: Some(Money::from_pence(300)),
                    requires_extra_info: true,
                },
                AddOn {
                    id: "vase".to_string(),
                    name: "Vase".to_string(),
                    price: Some(Money::from_pence(1500)),
                    requires_extra_info: false,
                },
            ],
            add_on_details: BTreeMap::from([("card".to_string(), "With love".to_string())]),
            quantity: 1,
            total_price: Money::from_pence(10800),
        });
        cart
    }

    fn order() -> Order {
        let customer = Customer {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "07700 900123".to_string(),
            address: "12 St James's Square".to_string(),
            postcode: "SW1Y 4JH".to_string(),
            delivery_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            card_message: Some("Happy Valentine's".to_string()),
            notes: None,
        };
        let delivery = DeliveryQuote {
            postcode: "SW1Y 4JH".to_string(),
            kind: DeliveryKind::Local {
                shop: "London".to_string(),
                distance_miles: 0.8,
            },
            fee: Money::from_pence(500),
        };
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 14, 5, 9).unwrap();
        Order::new(customer, &cart(), delivery, now)
    }

    #[test]
    fn test_reference_format() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 8, 0, 30).unwrap();
        assert_eq!(order_reference(now), "BB-20241201-080030");
    }

    #[test]
    fn test_totals_include_delivery() {
        let order = order();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.subtotal, Money::from_pence(17000 + 10800));
        assert_eq!(order.total, Money::from_pence(17000 + 10800 + 500));
        assert_eq!(order.reference, "BB-20240210-140509");
    }

    #[test]
    fn test_custom_line_lists_size_and_add_ons() {
        let order = order();
        let custom = &order.lines[1];
        assert_eq!(
            custom.details,
            vec![
                "Size: Large (36 roses)".to_string(),
                "Add-on: Gift Card \"With love\"".to_string(),
                "Add-on: Vase".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_text() {
        let text = order().summary_text();
        assert!(text.starts_with("Order BB-20240210-140509"));
        assert!(text.contains("- 2 x Classic Red (£85.00 each) = £170.00"));
        assert!(text.contains("    Size: Large (36 roses)"));
        assert!(text.contains("Delivery date: 14/02/2024"));
        assert!(text.contains("Total: £283.00"));
        assert!(text.contains("Card message: Happy Valentine's"));
        assert!(!text.contains("Notes:"));
    }
}
