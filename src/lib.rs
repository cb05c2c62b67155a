pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod field;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, ShopConfig};

pub use adapters::{EmailRelay, MessagingHandoff, PostcodesIoClient, SanityClient};
pub use core::{Cart, CartStore, Checkout, CheckoutForm, Customization, DeliveryQuoter, Storefront};
pub use field::{ParticleField, Simulation};
pub use utils::error::{Result, ShopError};
