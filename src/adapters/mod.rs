// Concrete implementations of the domain ports for external services.

pub mod emailjs;
pub mod messaging;
pub mod postcodes;
pub mod sanity;

pub use emailjs::{EmailRelay, EmailRelayConfig};
pub use messaging::{MessagingConfig, MessagingHandoff, MessagingPlatform};
pub use postcodes::PostcodesIoClient;
pub use sanity::SanityClient;
