pub mod cart;
pub mod checkout;
pub mod customization;
pub mod delivery;
pub mod order;
pub mod storefront;

pub use cart::{Cart, CartStore};
pub use checkout::{Checkout, CheckoutForm};
pub use customization::Customization;
pub use delivery::{DeliveryPolicy, DeliveryQuote, DeliveryQuoter};
pub use order::{Order, SubmissionReceipt};
pub use storefront::Storefront;
